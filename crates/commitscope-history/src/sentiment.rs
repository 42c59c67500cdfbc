// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Sentiment classifier seam
//!
//! The classifier itself is an external collaborator. This module only fixes
//! the shape of its answer and how the top label is picked from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One (label, confidence) pair from a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Label name, e.g. `positive`
    pub label: String,
    /// Confidence reported by the classifier
    #[serde(default)]
    pub score: f64,
}

/// Errors reported by a sentiment classifier
#[derive(Debug, Error)]
pub enum SentimentError {
    /// The classifier could not be reached or run
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    /// The classifier answered with something other than a ranked list
    #[error("Invalid classifier output: {0}")]
    InvalidOutput(String),
}

/// A text classifier returning labels ranked best-first
pub trait SentimentClassifier {
    /// Classify `text`
    ///
    /// # Errors
    ///
    /// Returns `SentimentError` if the classifier fails.
    fn classify(&self, text: &str) -> Result<Vec<SentimentScore>, SentimentError>;
}

impl<F> SentimentClassifier for F
where
    F: Fn(&str) -> Result<Vec<SentimentScore>, SentimentError>,
{
    fn classify(&self, text: &str) -> Result<Vec<SentimentScore>, SentimentError> {
        self(text)
    }
}

/// The single top-ranked label of a ranked list
#[must_use]
pub fn top_label(ranking: &[SentimentScore]) -> Option<&str> {
    ranking.first().map(|s| s.label.as_str())
}
