// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for commitscope-cluster

use thiserror::Error;

/// Errors that can occur while extracting features or clustering
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClusterError {
    /// The requested cluster count is not a positive integer
    #[error("Invalid number of clusters: {input}")]
    InvalidClusterCount {
        /// The count as supplied by the caller
        input: String,
    },

    /// Fewer distinct authors than requested clusters
    #[error("Number of clusters ({clusters}) is greater than the number of developers ({authors})")]
    InsufficientPopulation {
        /// Distinct authors in the feature table
        authors: usize,
        /// Requested cluster count
        clusters: usize,
    },

    /// The commit history spans zero days, so commit frequency is undefined
    #[error("Commit history spans zero days; commit frequency is undefined")]
    DegenerateHistory,
}
