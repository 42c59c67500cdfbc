// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for commitscope-history

use thiserror::Error;

use crate::sentiment::SentimentError;

/// Errors that can occur while parsing, storing, or searching history
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A commit date is neither normalized nor a parseable timestamp
    #[error("Unrecognized date format: {input}")]
    DateFormat {
        /// The date string that could not be interpreted
        input: String,
    },

    /// A search boundary date is not a valid `yyyy-mm-dd` date
    #[error("Invalid boundary date (expected yyyy-mm-dd): {input}")]
    InvalidBoundary {
        /// The boundary string as supplied by the caller
        input: String,
    },

    /// A raw record does not have the expected shape
    #[error("Malformed record: {reason}")]
    MalformedRecord {
        /// What was wrong with the record
        reason: String,
    },

    /// No table has been ingested for the repository
    #[error("Repository not found: {repository}")]
    NotFound {
        /// The repository name that was looked up
        repository: String,
    },

    /// The sentiment classifier failed on a message
    #[error("Sentiment classification failed: {0}")]
    Sentiment(#[from] SentimentError),

    /// Error (de)serializing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
