// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command dispatch for the commitscope binary
//!
//! Every subcommand loads its repository from the configured source, runs
//! one service operation and writes the JSON result to `out`.

use std::io::Write;
use std::sync::Arc;

use commitscope_history::CommitStore;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::classifier::CommandClassifier;
use crate::config::{Command, Config, ConfigError};
use crate::service::{SearchRequest, Service, ServiceError};
use crate::source::JsonDirSource;

/// Errors from running a subcommand
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A service operation failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Failed to serialize output
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write output
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Build a service from the configuration
#[must_use]
pub fn build_service(config: &Config) -> Service {
    let service = Service::new(Arc::new(CommitStore::new())).with_kmeans(config.kmeans());
    match config.classifier_command() {
        Some((program, args)) => {
            let classifier = CommandClassifier::new(program, args);
            debug!(program = classifier.program(), "Using external sentiment classifier");
            service.with_classifier(Box::new(classifier))
        }
        None => service,
    }
}

/// Validate `config` and run `command`, writing JSON to `out`
///
/// # Errors
///
/// Returns `AppError` if validation, the operation, or writing fails.
pub fn execute(config: &Config, command: &Command, out: &mut impl Write) -> Result<(), AppError> {
    config.validate()?;

    let source = JsonDirSource::new(config.source_path());
    let service = build_service(config);

    match command {
        Command::Ingest { repo } => {
            let summary = service.ingest_from(&source, repo)?;
            write_json(out, &summary)
        }
        Command::Search(args) => {
            service.ingest_from(&source, &args.repo)?;
            let outcome = service.search(&SearchRequest::from(args))?;
            write_json(out, &outcome)
        }
        Command::Group {
            repo,
            clusters,
            no_issues,
        } => {
            service.ingest_from(&source, repo)?;
            let assignments = if *no_issues {
                service.group(repo, None, clusters)?
            } else {
                service.group_from(&source, repo, clusters)?
            };
            write_json(out, &assignments)
        }
    }
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
