// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the commitscope command-line tool
//!
//! This module provides the clap-derived argument set: where raw history is
//! read from, which external sentiment classifier to run, k-means tuning,
//! and logging options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use commitscope_cluster::KMeansConfig;
use commitscope_cluster::kmeans::{DEFAULT_MAX_ITERATIONS, DEFAULT_SEED};

use crate::service::SearchRequest;

/// commitscope - search commit history and group contributors
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "commitscope")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Operation to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Root directory of raw repository history
    ///
    /// Each repository is a subdirectory holding `commits.json` and,
    /// optionally, `issues.json`. Defaults to ~/.local/share/commitscope
    /// (or platform equivalent).
    #[arg(short, long, global = true, env = "COMMITSCOPE_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// External sentiment classifier command
    ///
    /// Receives a commit message on stdin and prints a JSON ranked list of
    /// `{"label", "score"}` objects. Arguments are split on whitespace.
    #[arg(short, long, global = true, env = "COMMITSCOPE_CLASSIFIER")]
    pub classifier: Option<String>,

    /// Seed for k-means centroid initialization
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Upper bound on k-means iterations
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so that stdout carries only JSON.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load a repository's commits and print an ingestion summary
    Ingest {
        /// Repository name (subdirectory of the source dir)
        repo: String,
    },

    /// Search a repository's commits
    ///
    /// Every filter is optional; giving none returns the whole history.
    /// Prints `null` when nothing matches.
    ///
    /// Example:
    ///   commitscope search my-repo --message fix --start-date 2024-01-01
    Search(SearchArgs),

    /// Group a repository's contributors with k-means
    Group {
        /// Repository name (subdirectory of the source dir)
        repo: String,

        /// Number of groups
        #[arg(short = 'k', long)]
        clusters: String,

        /// Ignore issue history even when available
        #[arg(long, default_value = "false")]
        no_issues: bool,
    },
}

/// Filters for the `search` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Repository name (subdirectory of the source dir)
    pub repo: String,

    /// Exact commit SHA
    #[arg(long)]
    pub sha: Option<String>,

    /// Exact author name
    #[arg(long)]
    pub author: Option<String>,

    /// Exact committer name
    #[arg(long)]
    pub committer: Option<String>,

    /// Case-sensitive message substring
    #[arg(short, long)]
    pub message: Option<String>,

    /// Earliest commit date, inclusive (yyyy-mm-dd)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Latest commit date, inclusive (yyyy-mm-dd)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Annotate each hit with a sentiment label
    #[arg(long, default_value = "false")]
    pub sentiment: bool,
}

impl From<&SearchArgs> for SearchRequest {
    fn from(args: &SearchArgs) -> Self {
        SearchRequest {
            repo: args.repo.clone(),
            sha: args.sha.clone(),
            author: args.author.clone(),
            committer: args.committer.clone(),
            message: args.message.clone(),
            start_date: args.start_date.clone(),
            end_date: args.end_date.clone(),
            with_sentiment: args.sentiment,
        }
    }
}

impl Config {
    /// Get the source directory, using a default if not specified
    ///
    /// Default location is platform-specific:
    /// - macOS: ~/Library/Application Support/commitscope
    /// - Linux: ~/.local/share/commitscope
    /// - Windows: %LOCALAPPDATA%\commitscope
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.source_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("commitscope")
        })
    }

    /// The classifier command split into program and arguments
    #[must_use]
    pub fn classifier_command(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.classifier.as_deref()?.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
    }

    /// K-means tuning from the command line
    #[must_use]
    pub fn kmeans(&self) -> KMeansConfig {
        KMeansConfig::default()
            .seed(self.seed)
            .max_iterations(self.max_iterations)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source directory doesn't exist or isn't a directory
    /// - Sentiment is requested but no classifier is configured
    /// - The iteration bound is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let source = self.source_path();
        if !source.exists() {
            return Err(ConfigError::SourceNotFound(source));
        }
        if !source.is_dir() {
            return Err(ConfigError::SourceNotDirectory(source));
        }

        if let Some(Command::Search(args)) = &self.command
            && args.sentiment
            && self.classifier_command().is_none()
        {
            return Err(ConfigError::ClassifierMissing);
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidIterations);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Source directory not found
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    /// Source path is not a directory
    #[error("Source path is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    /// Sentiment requested without a classifier
    #[error("Sentiment requested but no classifier is configured (set --classifier or COMMITSCOPE_CLASSIFIER)")]
    ClassifierMissing,

    /// Iteration bound of zero
    #[error("--max-iterations must be at least 1")]
    InvalidIterations,
}
