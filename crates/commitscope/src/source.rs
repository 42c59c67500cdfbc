// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Raw repository content sources
//!
//! A [`ContentSource`] hands back a repository's full commit and issue
//! history as raw JSON values. Fetching from a hosting API is left to
//! whatever produced the data; [`JsonDirSource`] reads it from disk.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// File holding a repository's raw commits
pub const COMMITS_FILE: &str = "commits.json";

/// File holding a repository's raw issues
pub const ISSUES_FILE: &str = "issues.json";

/// Content source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested history does not exist
    #[error("No history at {path}")]
    Missing {
        /// Where the history was expected
        path: PathBuf,
    },

    /// The repository name is not a single directory name
    #[error("Invalid repository name: {name:?}")]
    InvalidRepository {
        /// Rejected name
        name: String,
    },

    /// Reading the history failed
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The history is not a JSON array
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// File being parsed
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}

/// Supplier of raw commit and issue history
pub trait ContentSource {
    /// Every raw commit of `repo`
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the history cannot be retrieved.
    fn raw_commits(&self, repo: &str) -> Result<Vec<Value>, SourceError>;

    /// Every raw issue of `repo`
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the history cannot be retrieved.
    fn raw_issues(&self, repo: &str) -> Result<Vec<Value>, SourceError>;
}

/// Reads `<root>/<repo>/commits.json` and `<root>/<repo>/issues.json`
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    root: PathBuf,
}

impl JsonDirSource {
    /// Create a source rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of one history file for `repo`
    #[must_use]
    pub fn file_path(&self, repo: &str, file: &str) -> PathBuf {
        self.root.join(repo).join(file)
    }

    fn read_array(&self, repo: &str, file: &str) -> Result<Vec<Value>, SourceError> {
        if !is_plain_name(repo) {
            return Err(SourceError::InvalidRepository {
                name: repo.to_string(),
            });
        }
        let path = self.file_path(repo, file);
        if !path.is_file() {
            return Err(SourceError::Missing { path });
        }
        let content = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let values: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| SourceError::Json {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), records = values.len(), "Read raw history");
        Ok(values)
    }
}

/// A repository name must stay inside the root
fn is_plain_name(repo: &str) -> bool {
    let mut components = Path::new(repo).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !repo.contains(['/', '\\'])
}

impl ContentSource for JsonDirSource {
    fn raw_commits(&self, repo: &str) -> Result<Vec<Value>, SourceError> {
        self.read_array(repo, COMMITS_FILE)
    }

    fn raw_issues(&self, repo: &str) -> Result<Vec<Value>, SourceError> {
        self.read_array(repo, ISSUES_FILE)
    }
}
