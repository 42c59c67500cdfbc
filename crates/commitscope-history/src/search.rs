// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Filtered search over a commit table
//!
//! A [`SearchQuery`] is a conjunction of optional predicates. Each present
//! predicate becomes a typed filter function; a row matches when all of them
//! accept it. No predicates means the whole table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date;
use crate::error::HistoryError;
use crate::record::CommitRecord;
use crate::sentiment::{SentimentClassifier, top_label};

/// Inclusive date bounds, either side optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest accepted date
    pub start: Option<NaiveDate>,
    /// Latest accepted date
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Check whether `date` lies within the bounds (inclusive on both ends)
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    /// Check if neither bound is set
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// A set of independently optional search predicates
///
/// Empty strings are treated as absent predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Exact SHA
    pub sha: Option<String>,
    /// Exact author name
    pub author: Option<String>,
    /// Exact committer name
    pub committer: Option<String>,
    /// Case-sensitive message substring
    pub message: Option<String>,
    /// Inclusive date bounds
    pub date_range: DateRange,
}

type Predicate<'q> = Box<dyn Fn(&CommitRecord) -> bool + 'q>;

impl SearchQuery {
    /// A query with no predicates (matches everything)
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Require an exact SHA
    #[must_use]
    pub fn sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = non_empty(sha.into());
        self
    }

    /// Require an exact author name
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = non_empty(author.into());
        self
    }

    /// Require an exact committer name
    #[must_use]
    pub fn committer(mut self, committer: impl Into<String>) -> Self {
        self.committer = non_empty(committer.into());
        self
    }

    /// Require the message to contain `needle`
    #[must_use]
    pub fn message(mut self, needle: impl Into<String>) -> Self {
        self.message = non_empty(needle.into());
        self
    }

    /// Only include commits on or after `date`
    #[must_use]
    pub fn since(mut self, date: NaiveDate) -> Self {
        self.date_range.start = Some(date);
        self
    }

    /// Only include commits on or before `date`
    #[must_use]
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.date_range.end = Some(date);
        self
    }

    /// Set date bounds from `yyyy-mm-dd` strings
    ///
    /// Absent or empty strings leave that side unbounded.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::InvalidBoundary` if a bound is not a valid
    /// `yyyy-mm-dd` date.
    pub fn with_boundaries(
        mut self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, HistoryError> {
        self.date_range.start = parse_optional_boundary(start)?;
        self.date_range.end = parse_optional_boundary(end)?;
        Ok(self)
    }

    /// Check if no predicate is set
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.sha.is_none()
            && self.author.is_none()
            && self.committer.is_none()
            && self.message.is_none()
            && self.date_range.is_unbounded()
    }

    /// Check a single row against every predicate
    #[must_use]
    pub fn matches(&self, record: &CommitRecord) -> bool {
        self.predicates().iter().all(|p| p(record))
    }

    fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates: Vec<Predicate<'_>> = Vec::new();
        if let Some(sha) = &self.sha {
            predicates.push(Box::new(move |r: &CommitRecord| r.sha == *sha));
        }
        if let Some(author) = &self.author {
            predicates.push(Box::new(move |r: &CommitRecord| r.author == *author));
        }
        if let Some(committer) = &self.committer {
            predicates.push(Box::new(move |r: &CommitRecord| r.committer == *committer));
        }
        if let Some(needle) = &self.message {
            predicates.push(Box::new(move |r: &CommitRecord| r.message.contains(needle.as_str())));
        }
        if !self.date_range.is_unbounded() {
            let range = self.date_range;
            predicates.push(Box::new(move |r: &CommitRecord| range.contains(r.date)));
        }
        predicates
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn parse_optional_boundary(input: Option<&str>) -> Result<Option<NaiveDate>, HistoryError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => date::parse_boundary_date(s).map(Some),
    }
}

/// A matched commit, optionally annotated with a sentiment label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched commit
    #[serde(flatten)]
    pub record: CommitRecord,
    /// Top-ranked sentiment label for the message, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

/// Result of a search
///
/// Serializes as a JSON array of hits, or `null` when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// Matching commits in table order
    Matches(Vec<SearchHit>),
    /// Nothing matched
    NoResults,
}

impl SearchOutcome {
    /// The matched hits (empty for `NoResults`)
    #[must_use]
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Matches(hits) => hits,
            Self::NoResults => &[],
        }
    }

    /// Consume into the matched hits
    #[must_use]
    pub fn into_hits(self) -> Vec<SearchHit> {
        match self {
            Self::Matches(hits) => hits,
            Self::NoResults => Vec::new(),
        }
    }

    /// Number of hits
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits().len()
    }

    /// Check if nothing matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoResults)
    }
}

/// Search `rows` with `query`, keeping table order
///
/// When a classifier is given, each hit's message is classified and the
/// top-ranked label attached to the hit. The table itself is never modified.
///
/// # Errors
///
/// Returns `HistoryError::Sentiment` if the classifier fails on any hit; no
/// partial result is returned in that case.
pub fn search(
    rows: &[CommitRecord],
    query: &SearchQuery,
    classifier: Option<&dyn SentimentClassifier>,
) -> Result<SearchOutcome, HistoryError> {
    let predicates = query.predicates();
    let matched: Vec<&CommitRecord> = rows
        .iter()
        .filter(|r| predicates.iter().all(|p| p(*r)))
        .collect();

    debug!(
        rows = rows.len(),
        predicates = predicates.len(),
        matched = matched.len(),
        sentiment = classifier.is_some(),
        "Search evaluated"
    );

    if matched.is_empty() {
        return Ok(SearchOutcome::NoResults);
    }

    let hits = matched
        .into_iter()
        .map(|record| {
            let sentiment = match classifier {
                Some(classifier) => {
                    let ranking = classifier.classify(&record.message)?;
                    top_label(&ranking).map(str::to_string)
                }
                None => None,
            };
            Ok(SearchHit {
                record: record.clone(),
                sentiment,
            })
        })
        .collect::<Result<Vec<_>, HistoryError>>()?;

    Ok(SearchOutcome::Matches(hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{SentimentError, SentimentScore};
    use similar_asserts::assert_eq;
    use std::cell::Cell;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn commit(sha: &str, author: &str, committer: &str, date: NaiveDate, message: &str) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            author: author.to_string(),
            committer: committer.to_string(),
            date,
            message: message.to_string(),
            changed_files: vec!["src/main.rs".to_string()],
            files_changed_count: 1,
            lines_added: 1,
            lines_deleted: 0,
            lines_changed_total: 1,
        }
    }

    fn sample_rows() -> Vec<CommitRecord> {
        vec![
            commit("a1", "alice", "github", ymd(2024, 3, 1), "fix bug"),
            commit("b2", "bob", "bob", ymd(2024, 3, 2), "add feature"),
            commit("c3", "alice", "bob", ymd(2024, 3, 3), "fix typo"),
            commit("d4", "carol", "github", ymd(2024, 3, 5), "Fix docs"),
        ]
    }

    fn shas(outcome: &SearchOutcome) -> Vec<&str> {
        outcome.hits().iter().map(|h| h.record.sha.as_str()).collect()
    }

    #[test]
    fn test_no_predicates_returns_everything_in_order() {
        let rows = sample_rows();
        let outcome = search(&rows, &SearchQuery::all(), None).expect("search");
        assert_eq!(shas(&outcome), vec!["a1", "b2", "c3", "d4"]);
        assert!(outcome.hits().iter().all(|h| h.sentiment.is_none()));
    }

    #[test]
    fn test_message_substring_is_case_sensitive() {
        let rows = sample_rows();
        let outcome = search(&rows, &SearchQuery::all().message("fix"), None).expect("search");
        assert_eq!(shas(&outcome), vec!["a1", "c3"]);
    }

    #[test]
    fn test_exact_sha() {
        let rows = sample_rows();
        let outcome = search(&rows, &SearchQuery::all().sha("b2"), None).expect("search");
        assert_eq!(shas(&outcome), vec!["b2"]);

        let outcome = search(&rows, &SearchQuery::all().sha("b"), None).expect("search");
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_author_and_committer_are_anded() {
        let rows = sample_rows();
        let query = SearchQuery::all().author("alice").committer("bob");
        let outcome = search(&rows, &query, None).expect("search");
        assert_eq!(shas(&outcome), vec!["c3"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let rows = sample_rows();
        let query = SearchQuery::all().since(ymd(2024, 3, 2)).until(ymd(2024, 3, 3));
        let outcome = search(&rows, &query, None).expect("search");
        assert_eq!(shas(&outcome), vec!["b2", "c3"]);
    }

    #[test]
    fn test_open_ended_ranges() {
        let rows = sample_rows();
        let outcome = search(&rows, &SearchQuery::all().since(ymd(2024, 3, 3)), None).expect("search");
        assert_eq!(shas(&outcome), vec!["c3", "d4"]);
        let outcome = search(&rows, &SearchQuery::all().until(ymd(2024, 3, 1)), None).expect("search");
        assert_eq!(shas(&outcome), vec!["a1"]);
    }

    #[test]
    fn test_with_boundaries_parses_iso_dates() {
        let query = SearchQuery::all()
            .with_boundaries(Some("2024-03-02"), Some(""))
            .expect("boundaries");
        assert_eq!(query.date_range.start, Some(ymd(2024, 3, 2)));
        assert_eq!(query.date_range.end, None);
    }

    #[test]
    fn test_with_boundaries_rejects_normalized_form() {
        let result = SearchQuery::all().with_boundaries(Some("02-03-2024"), None);
        assert!(matches!(result, Err(HistoryError::InvalidBoundary { .. })));
    }

    #[test]
    fn test_empty_strings_are_absent_predicates() {
        let query = SearchQuery::all().sha("").author("").committer("").message("");
        assert!(query.is_unfiltered());
    }

    #[test]
    fn test_no_results_is_explicit() {
        let rows = sample_rows();
        let outcome = search(&rows, &SearchQuery::all().author("mallory"), None).expect("search");
        assert_eq!(outcome, SearchOutcome::NoResults);
        assert_eq!(serde_json::to_string(&outcome).expect("serialize"), "null");
    }

    #[test]
    fn test_empty_table_is_no_results() {
        let outcome = search(&[], &SearchQuery::all(), None).expect("search");
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_sentiment_annotation_per_hit() {
        let rows = sample_rows();
        let calls = Cell::new(0);
        let classifier = |text: &str| -> Result<Vec<SentimentScore>, SentimentError> {
            calls.set(calls.get() + 1);
            let label = if text.starts_with("fix") { "negative" } else { "positive" };
            Ok(vec![
                SentimentScore {
                    label: label.to_string(),
                    score: 0.8,
                },
                SentimentScore {
                    label: "neutral".to_string(),
                    score: 0.2,
                },
            ])
        };
        let outcome = search(&rows, &SearchQuery::all().author("alice"), Some(&classifier))
            .expect("search");
        let labels: Vec<Option<&str>> = outcome
            .hits()
            .iter()
            .map(|h| h.sentiment.as_deref())
            .collect();
        assert_eq!(labels, vec![Some("negative"), Some("negative")]);
        // Only surviving rows are classified
        assert_eq!(calls.get(), 2);
        // The table is untouched
        assert_eq!(rows[0], sample_rows()[0]);
    }

    #[test]
    fn test_sentiment_failure_rejects_call() {
        let rows = sample_rows();
        let classifier = |_: &str| -> Result<Vec<SentimentScore>, SentimentError> {
            Err(SentimentError::Unavailable("model offline".to_string()))
        };
        let result = search(&rows, &SearchQuery::all(), Some(&classifier));
        assert!(matches!(result, Err(HistoryError::Sentiment(_))));
    }

    #[test]
    fn test_hit_serialization_is_flat() {
        let rows = sample_rows();
        let classifier = |_: &str| -> Result<Vec<SentimentScore>, SentimentError> {
            Ok(vec![SentimentScore {
                label: "positive".to_string(),
                score: 0.99,
            }])
        };
        let outcome = search(&rows, &SearchQuery::all().sha("a1"), Some(&classifier)).expect("search");
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(json[0]["sha"], serde_json::json!("a1"));
        assert_eq!(json[0]["date"], serde_json::json!("01-03-2024"));
        assert_eq!(json[0]["sentiment"], serde_json::json!("positive"));
    }

    #[test]
    fn test_matches_single_row() {
        let row = commit("x", "alice", "alice", ymd(2024, 1, 1), "refactor parser");
        assert!(SearchQuery::all().message("parser").matches(&row));
        assert!(!SearchQuery::all().message("Parser").matches(&row));
    }
}
