// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! In-memory commit tables keyed by repository name

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::HistoryError;
use crate::record::CommitRecord;

/// Shared, immutable snapshot of one repository's commits
pub type CommitTable = Arc<[CommitRecord]>;

/// Process-lifetime store of commit tables
///
/// Construct one and pass it to every operation that needs history. Each
/// `put` swaps in a whole table; readers holding an earlier snapshot keep
/// seeing it unchanged.
#[derive(Debug, Default)]
pub struct CommitStore {
    tables: RwLock<HashMap<String, CommitTable>>,
}

impl CommitStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table for `repo` with `commits`
    ///
    /// Returns the previous table, if any. Concurrent writers for the same
    /// name are serialized; the last one wins.
    pub fn put(&self, repo: &str, commits: Vec<CommitRecord>) -> Option<CommitTable> {
        let table: CommitTable = commits.into();
        debug!(repository = %repo, commits = table.len(), "Storing commit table");
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(repo.to_string(), table)
    }

    /// Get the table for `repo`
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::NotFound` if the repository was never ingested.
    pub fn get(&self, repo: &str) -> Result<CommitTable, HistoryError> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(repo)
            .cloned()
            .ok_or_else(|| HistoryError::NotFound {
                repository: repo.to_string(),
            })
    }

    /// Check whether `repo` has a table
    #[must_use]
    pub fn contains(&self, repo: &str) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(repo)
    }

    /// Drop the table for `repo`, returning it if present
    pub fn remove(&self, repo: &str) -> Option<CommitTable> {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(repo)
    }

    /// Names of all stored repositories, sorted
    #[must_use]
    pub fn repositories(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of stored repositories
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the store holds no tables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
