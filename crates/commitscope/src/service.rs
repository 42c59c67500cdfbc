// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Consumer-facing operations
//!
//! [`Service`] ties the commit store, an optional sentiment classifier and
//! k-means tuning together behind the three operations callers use:
//! ingest, search and group.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use commitscope::service::{SearchRequest, Service};
//! use commitscope_history::CommitStore;
//! use serde_json::json;
//!
//! let service = Service::new(Arc::new(CommitStore::new()));
//! let raw = vec![json!({
//!     "sha": "a1",
//!     "commit": {
//!         "author": { "name": "alice", "date": "2024-03-01T09:00:00Z" },
//!         "committer": { "name": "alice" },
//!         "message": "fix bug"
//!     }
//! })];
//!
//! let summary = service.ingest("demo", &raw).expect("ingest");
//! assert_eq!(summary.commits_ingested, 1);
//!
//! let outcome = service.search(&SearchRequest::new("demo")).expect("search");
//! assert_eq!(outcome.len(), 1);
//! ```

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use commitscope_cluster::{
    ClusterAssignment, ClusterError, KMeansConfig, check_population, cluster, extract_commit_features,
    extract_issue_features, merge_features, parse_cluster_count,
};
use commitscope_history::{
    CommitRecord, CommitStore, HistoryError, IssueRecord, SearchOutcome, SearchQuery,
    SentimentClassifier, parse_commit_value, parse_issue_value, search,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::source::ContentSource;

/// Records shown in an ingestion summary
pub const PREVIEW_LEN: usize = 5;

// ============================================================================
// Error Types
// ============================================================================

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// History parsing, lookup or search failed
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Feature extraction or clustering failed
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    /// Ingestion produced no usable commit
    #[error("No valid commits for {repository} ({skipped} skipped)")]
    NoValidCommits {
        /// Repository being ingested
        repository: String,
        /// Records rejected by the parser
        skipped: usize,
    },

    /// The content source failed
    #[error("Upstream source failed: {0}")]
    Upstream(String),

    /// Sentiment was requested but no classifier is configured
    #[error("Sentiment requested but no classifier is configured")]
    ClassifierUnavailable,
}

// ============================================================================
// Requests and Summaries
// ============================================================================

/// Result of an ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Repository name
    pub repository: String,
    /// Commits stored
    pub commits_ingested: usize,
    /// Raw records the parser rejected
    pub commits_skipped: usize,
    /// The first stored commits
    pub preview: Vec<CommitRecord>,
}

/// A search over one repository
///
/// Absent and empty filters are ignored. Dates are `yyyy-mm-dd`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Repository name
    pub repo: String,
    /// Exact SHA
    #[serde(default)]
    pub sha: Option<String>,
    /// Exact author name
    #[serde(default)]
    pub author: Option<String>,
    /// Exact committer name
    #[serde(default)]
    pub committer: Option<String>,
    /// Message substring
    #[serde(default)]
    pub message: Option<String>,
    /// Earliest date, inclusive
    #[serde(default)]
    pub start_date: Option<String>,
    /// Latest date, inclusive
    #[serde(default)]
    pub end_date: Option<String>,
    /// Attach a sentiment label to each hit
    #[serde(default)]
    pub with_sentiment: bool,
}

impl SearchRequest {
    /// An unfiltered search of `repo`
    #[must_use]
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            ..Default::default()
        }
    }

    /// Build the typed query
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::InvalidBoundary` for a malformed date.
    pub fn query(&self) -> Result<SearchQuery, HistoryError> {
        SearchQuery::all()
            .sha(self.sha.clone().unwrap_or_default())
            .author(self.author.clone().unwrap_or_default())
            .committer(self.committer.clone().unwrap_or_default())
            .message(self.message.clone().unwrap_or_default())
            .with_boundaries(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

// ============================================================================
// Service
// ============================================================================

/// Shared sentiment classifier handle
pub type BoxedClassifier = Box<dyn SentimentClassifier + Send + Sync>;

/// Entry point for ingesting, searching and grouping
pub struct Service {
    store: Arc<CommitStore>,
    classifier: Option<BoxedClassifier>,
    kmeans: KMeansConfig,
}

impl Service {
    /// Create a service over `store`
    #[must_use]
    pub fn new(store: Arc<CommitStore>) -> Self {
        Self {
            store,
            classifier: None,
            kmeans: KMeansConfig::default(),
        }
    }

    /// Use `classifier` for sentiment-annotated searches
    #[must_use]
    pub fn with_classifier(mut self, classifier: BoxedClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use `config` for grouping
    #[must_use]
    pub fn with_kmeans(mut self, config: KMeansConfig) -> Self {
        self.kmeans = config;
        self
    }

    /// The underlying store
    #[must_use]
    pub fn store(&self) -> &CommitStore {
        &self.store
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Parse raw commits and replace the table for `repo`
    ///
    /// Records that fail to parse, and repeats of an earlier SHA, are skipped
    /// and counted. The table is only replaced when at least one commit
    /// survives.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NoValidCommits` if nothing parsed; the
    /// previous table (if any) is left in place.
    pub fn ingest(&self, repo: &str, raw: &[Value]) -> Result<IngestSummary, ServiceError> {
        info!(repository = %repo, records = raw.len(), "Starting ingestion");

        let mut commits: Vec<CommitRecord> = Vec::with_capacity(raw.len());
        let mut seen = HashSet::with_capacity(raw.len());
        let mut skipped = 0;
        for (index, value) in raw.iter().enumerate() {
            match parse_commit_value(value) {
                Ok(commit) if !seen.insert(commit.sha.clone()) => {
                    warn!(
                        repository = %repo,
                        index,
                        sha = commit.short_sha(),
                        subject = commit.subject(),
                        "Skipping duplicate commit"
                    );
                    skipped += 1;
                }
                Ok(commit) => commits.push(commit),
                Err(e) => {
                    warn!(repository = %repo, index, error = %e, "Skipping commit");
                    skipped += 1;
                }
            }
        }

        if commits.is_empty() {
            return Err(ServiceError::NoValidCommits {
                repository: repo.to_string(),
                skipped,
            });
        }

        let summary = IngestSummary {
            repository: repo.to_string(),
            commits_ingested: commits.len(),
            commits_skipped: skipped,
            preview: commits.iter().take(PREVIEW_LEN).cloned().collect(),
        };
        self.store.put(repo, commits);

        info!(
            repository = %repo,
            ingested = summary.commits_ingested,
            skipped = summary.commits_skipped,
            "Ingestion complete"
        );
        Ok(summary)
    }

    /// Fetch raw commits from `source` and ingest them
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Upstream` if the source fails, otherwise as
    /// [`Service::ingest`].
    pub fn ingest_from(
        &self,
        source: &dyn ContentSource,
        repo: &str,
    ) -> Result<IngestSummary, ServiceError> {
        let raw = source
            .raw_commits(repo)
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        self.ingest(repo, &raw)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Search an ingested repository
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::History` for a bad boundary date, an unknown
    /// repository or a classifier failure. Returns
    /// `ServiceError::ClassifierUnavailable` if sentiment is requested
    /// without a classifier.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, ServiceError> {
        let query = request.query()?;
        let table = self.store.get(&request.repo)?;

        let classifier: Option<&dyn SentimentClassifier> = if request.with_sentiment {
            let classifier = self
                .classifier
                .as_deref()
                .ok_or(ServiceError::ClassifierUnavailable)?;
            Some(classifier as &dyn SentimentClassifier)
        } else {
            None
        };

        let outcome = search(&table, &query, classifier)?;
        debug!(repository = %request.repo, hits = outcome.len(), "Search complete");
        Ok(outcome)
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Group the contributors of an ingested repository into `k` clusters
    ///
    /// Issue records, when given, add issue columns to the features;
    /// malformed ones are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::History` for an unknown repository and
    /// `ServiceError::Cluster` for a bad `k`, too few authors or a history
    /// spanning zero days.
    pub fn group(
        &self,
        repo: &str,
        issues: Option<&[Value]>,
        k: &str,
    ) -> Result<Vec<ClusterAssignment>, ServiceError> {
        let table = self.store.get(repo)?;
        let k = parse_cluster_count(k)?;
        let issues = issues.map(|raw| parse_issues(repo, raw));

        let authors: BTreeSet<&str> = table
            .iter()
            .map(|c| c.author.as_str())
            .chain(issues.iter().flatten().map(|i| i.author.as_str()))
            .collect();
        check_population(authors.len(), k)?;

        let commit_features = extract_commit_features(&table)?;
        let issue_features = issues.as_deref().map(extract_issue_features);
        let features = merge_features(commit_features, issue_features);
        let assignments = cluster(&features, k, &self.kmeans)?;

        info!(
            repository = %repo,
            authors = features.len(),
            clusters = k,
            issue_features = features.has_issue_features,
            "Grouping complete"
        );
        Ok(assignments)
    }

    /// Group using issues from `source`, falling back to commits only if
    /// the issue history cannot be retrieved
    ///
    /// # Errors
    ///
    /// As [`Service::group`].
    pub fn group_from(
        &self,
        source: &dyn ContentSource,
        repo: &str,
        k: &str,
    ) -> Result<Vec<ClusterAssignment>, ServiceError> {
        let issues = match source.raw_issues(repo) {
            Ok(issues) => Some(issues),
            Err(e) => {
                warn!(repository = %repo, error = %e, "Issue history unavailable, grouping on commits only");
                None
            }
        };
        self.group(repo, issues.as_deref(), k)
    }
}

fn parse_issues(repo: &str, raw: &[Value]) -> Vec<IssueRecord> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, value)| match parse_issue_value(value) {
            Ok(issue) => Some(issue),
            Err(e) => {
                warn!(repository = %repo, index, error = %e, "Skipping issue");
                None
            }
        })
        .collect()
}
