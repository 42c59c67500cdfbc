// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit and issue record types
//!
//! Raw records are deserialized into the typed `Raw*` shapes first, then
//! normalized into [`CommitRecord`] / [`IssueRecord`]. Nothing loosely typed
//! travels past this module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date;
use crate::error::HistoryError;

/// A parsed, normalized commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit SHA
    pub sha: String,
    /// Author name
    pub author: String,
    /// Committer name
    pub committer: String,
    /// Authoring date, emitted as `dd-mm-yyyy`
    #[serde(with = "date::normalized")]
    pub date: NaiveDate,
    /// Commit message
    pub message: String,
    /// Paths of the files touched, in the order reported
    pub changed_files: Vec<String>,
    /// Always `changed_files.len()`
    pub files_changed_count: u64,
    /// Lines added
    pub lines_added: u64,
    /// Lines deleted
    pub lines_deleted: u64,
    /// Lines changed (additions plus deletions as reported by the source)
    pub lines_changed_total: u64,
}

impl CommitRecord {
    /// Get the short SHA (first 7 characters)
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// The date in its emitted `dd-mm-yyyy` form
    #[must_use]
    pub fn formatted_date(&self) -> String {
        date::format_date(self.date)
    }
}

/// Raw commit object, shaped like the GitHub "get a commit" response
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    /// The commit SHA
    pub sha: String,
    /// Nested commit metadata
    pub commit: RawCommitDetail,
    /// Per-file change entries
    #[serde(default)]
    pub files: Vec<RawFileChange>,
    /// Aggregate line statistics
    #[serde(default)]
    pub stats: RawStats,
}

/// Metadata nested under `commit`
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitDetail {
    /// Author identity and authoring date
    pub author: RawSignature,
    /// Committer identity
    pub committer: RawSignature,
    /// Commit message
    #[serde(default)]
    pub message: String,
}

/// A name/date identity pair
#[derive(Debug, Clone, Deserialize)]
pub struct RawSignature {
    /// Display name
    pub name: String,
    /// Raw date string (ISO 8601 or `dd-mm-yyyy`)
    #[serde(default)]
    pub date: Option<String>,
}

/// One file touched by a commit
#[derive(Debug, Clone, Deserialize)]
pub struct RawFileChange {
    /// Path of the file
    pub filename: String,
}

/// Line statistics for a commit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStats {
    /// Lines added
    #[serde(default)]
    pub additions: u64,
    /// Lines deleted
    #[serde(default)]
    pub deletions: u64,
    /// Lines changed
    #[serde(default)]
    pub total: u64,
}

/// Normalize a raw commit into a [`CommitRecord`]
///
/// # Errors
///
/// Returns `HistoryError::DateFormat` if the author date is missing or
/// cannot be interpreted. Such commits must be left out of the table.
pub fn parse_commit(raw: RawCommit) -> Result<CommitRecord, HistoryError> {
    let raw_date = raw.commit.author.date.as_deref().unwrap_or_default();
    let date = date::normalize_date(raw_date)?;

    let changed_files: Vec<String> = raw.files.into_iter().map(|f| f.filename).collect();

    Ok(CommitRecord {
        sha: raw.sha,
        author: raw.commit.author.name,
        committer: raw.commit.committer.name,
        date,
        message: raw.commit.message,
        files_changed_count: changed_files.len() as u64,
        changed_files,
        lines_added: raw.stats.additions,
        lines_deleted: raw.stats.deletions,
        lines_changed_total: raw.stats.total,
    })
}

/// Deserialize and normalize one raw commit JSON value
///
/// # Errors
///
/// Returns `HistoryError::MalformedRecord` if the value does not have the
/// raw commit shape, or `HistoryError::DateFormat` for a bad date.
pub fn parse_commit_value(value: &Value) -> Result<CommitRecord, HistoryError> {
    let raw = RawCommit::deserialize(value).map_err(|e| HistoryError::MalformedRecord {
        reason: e.to_string(),
    })?;
    parse_commit(raw)
}

// ============================================================================
// Issues
// ============================================================================

/// Labels that get their own feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownLabel {
    /// `bug`
    Bug,
    /// `documentation`
    Documentation,
    /// `duplicate`
    Duplicate,
    /// `enhancement`
    Enhancement,
    /// `future`
    Future,
}

impl KnownLabel {
    /// Every known label, in column order
    pub const ALL: [KnownLabel; 5] = [
        KnownLabel::Bug,
        KnownLabel::Documentation,
        KnownLabel::Duplicate,
        KnownLabel::Enhancement,
        KnownLabel::Future,
    ];

    /// Match a label name exactly; unknown names yield `None`
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bug" => Some(Self::Bug),
            "documentation" => Some(Self::Documentation),
            "duplicate" => Some(Self::Duplicate),
            "enhancement" => Some(Self::Enhancement),
            "future" => Some(Self::Future),
            _ => None,
        }
    }

    /// The label's name as it appears on issues
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Documentation => "documentation",
            Self::Duplicate => "duplicate",
            Self::Enhancement => "enhancement",
            Self::Future => "future",
        }
    }
}

/// One counter per [`KnownLabel`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    /// `bug`
    pub bug: u64,
    /// `documentation`
    pub documentation: u64,
    /// `duplicate`
    pub duplicate: u64,
    /// `enhancement`
    pub enhancement: u64,
    /// `future`
    pub future: u64,
}

impl LabelCounts {
    /// Increment the counter for a label
    pub fn increment(&mut self, label: KnownLabel) {
        *self.slot(label) += 1;
    }

    /// Read the counter for a label
    #[must_use]
    pub fn get(&self, label: KnownLabel) -> u64 {
        match label {
            KnownLabel::Bug => self.bug,
            KnownLabel::Documentation => self.documentation,
            KnownLabel::Duplicate => self.duplicate,
            KnownLabel::Enhancement => self.enhancement,
            KnownLabel::Future => self.future,
        }
    }

    /// Add another set of counts into this one
    pub fn merge(&mut self, other: &LabelCounts) {
        for label in KnownLabel::ALL {
            *self.slot(label) += other.get(label);
        }
    }

    fn slot(&mut self, label: KnownLabel) -> &mut u64 {
        match label {
            KnownLabel::Bug => &mut self.bug,
            KnownLabel::Documentation => &mut self.documentation,
            KnownLabel::Duplicate => &mut self.duplicate,
            KnownLabel::Enhancement => &mut self.enhancement,
            KnownLabel::Future => &mut self.future,
        }
    }
}

/// A normalized issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Login of the issue reporter
    pub author: String,
    /// State string exactly as reported by the source
    pub state: String,
    /// Counts of recognized labels on this issue
    pub labels: LabelCounts,
}

impl IssueRecord {
    /// Whether the issue counts as "opened"
    ///
    /// Only the literal state `"opened"` qualifies; `"open"` does not.
    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.state == "opened"
    }

    /// Whether the issue state is `"closed"`
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }
}

/// Raw issue object, shaped like the GitHub "list issues" response
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    /// Reporter
    pub user: RawUser,
    /// Issue state
    pub state: String,
    /// Labels attached to the issue
    #[serde(default)]
    pub labels: Vec<RawLabel>,
}

/// Issue reporter
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    /// Login name
    pub login: String,
}

/// A label, either a bare name or an object carrying one
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    /// `"bug"`
    Name(String),
    /// `{"name": "bug", ...}`
    Object {
        /// Label name
        name: String,
    },
}

impl RawLabel {
    /// The label name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Object { name } => name,
        }
    }
}

/// Normalize a raw issue, counting only recognized labels
#[must_use]
pub fn parse_issue(raw: RawIssue) -> IssueRecord {
    let mut labels = LabelCounts::default();
    for label in raw.labels.iter().filter_map(|l| KnownLabel::from_name(l.name())) {
        labels.increment(label);
    }
    IssueRecord {
        author: raw.user.login,
        state: raw.state,
        labels,
    }
}

/// Deserialize and normalize one raw issue JSON value
///
/// # Errors
///
/// Returns `HistoryError::MalformedRecord` if the value does not have the
/// raw issue shape.
pub fn parse_issue_value(value: &Value) -> Result<IssueRecord, HistoryError> {
    let raw = RawIssue::deserialize(value).map_err(|e| HistoryError::MalformedRecord {
        reason: e.to_string(),
    })?;
    Ok(parse_issue(raw))
}
