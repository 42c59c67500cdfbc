// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-author feature extraction
//!
//! Commit and issue histories are each summarized into one row per author,
//! then outer-joined on the author name into a [`FeatureTable`].

use std::collections::BTreeMap;

use commitscope_history::date::days_between;
use commitscope_history::{CommitRecord, IssueRecord, KnownLabel, LabelCounts};
use serde::Serialize;
use tracing::debug;

use crate::error::ClusterError;

/// Commit-derived columns for one author
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CommitColumns {
    /// Number of commits authored
    pub num_commits: u64,
    /// Commits per day across the whole repository's time span
    pub commit_frequency: f64,
    /// Sum of files changed over the author's commits
    pub num_files_changed: u64,
    /// Sum of lines added
    pub num_lines_added: u64,
    /// Sum of lines deleted
    pub num_lines_deleted: u64,
    /// Sum of lines changed
    pub num_lines_changed: u64,
}

impl CommitColumns {
    /// Column names, in matrix order
    pub const NAMES: [&'static str; 6] = [
        "num_commits",
        "commit_frequency",
        "num_files_changed",
        "num_lines_added",
        "num_lines_deleted",
        "num_lines_changed",
    ];

    fn push_values(&self, row: &mut Vec<f64>) {
        row.extend([
            self.num_commits as f64,
            self.commit_frequency,
            self.num_files_changed as f64,
            self.num_lines_added as f64,
            self.num_lines_deleted as f64,
            self.num_lines_changed as f64,
        ]);
    }
}

/// Issue-derived columns for one author
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueColumns {
    /// Issues reported
    pub num_issues: u64,
    /// Issues whose state is the literal `"opened"`
    pub num_opened: u64,
    /// Issues whose state is `"closed"`
    pub num_closed: u64,
    /// Recognized label counts
    #[serde(flatten)]
    pub labels: LabelCounts,
}

impl IssueColumns {
    /// Column names, in matrix order
    pub const NAMES: [&'static str; 8] = [
        "num_issues",
        "num_opened",
        "num_closed",
        "bug",
        "documentation",
        "duplicate",
        "enhancement",
        "future",
    ];

    fn push_values(&self, row: &mut Vec<f64>) {
        row.extend([
            self.num_issues as f64,
            self.num_opened as f64,
            self.num_closed as f64,
        ]);
        row.extend(KnownLabel::ALL.iter().map(|l| self.labels.get(*l) as f64));
    }
}

/// Commit summary for one author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitFeatures {
    /// Author name
    pub name: String,
    /// Aggregated commit columns
    #[serde(flatten)]
    pub columns: CommitColumns,
}

/// Issue summary for one author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueFeatures {
    /// Issue author login
    pub name: String,
    /// Aggregated issue columns
    #[serde(flatten)]
    pub columns: IssueColumns,
}

/// One row of the merged feature table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorFeatureVector {
    /// Join key
    pub name: String,
    /// Commit columns (zero when the author only reported issues)
    #[serde(flatten)]
    pub commits: CommitColumns,
    /// Issue columns, present on every row iff the table has issue data
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub issues: Option<IssueColumns>,
}

impl AuthorFeatureVector {
    /// Numeric values of this row with the join key stripped
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        let mut row = Vec::with_capacity(CommitColumns::NAMES.len() + IssueColumns::NAMES.len());
        self.commits.push_values(&mut row);
        if let Some(issues) = &self.issues {
            issues.push_values(&mut row);
        }
        row
    }
}

/// Merged per-author features, sorted by author name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureTable {
    /// One row per distinct author
    pub rows: Vec<AuthorFeatureVector>,
    /// Whether the issue columns are present
    pub has_issue_features: bool,
}

impl FeatureTable {
    /// Number of distinct authors
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names of [`FeatureTable::matrix`]
    #[must_use]
    pub fn columns(&self) -> Vec<&'static str> {
        let mut names = CommitColumns::NAMES.to_vec();
        if self.has_issue_features {
            names.extend(IssueColumns::NAMES);
        }
        names
    }

    /// Numeric matrix, one row per author in table order
    #[must_use]
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(AuthorFeatureVector::values).collect()
    }

    /// Author names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.name.as_str())
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Summarize a commit table per author
///
/// `commit_frequency` divides each author's commit count by the whole
/// repository's span in days (latest minus earliest commit date).
///
/// # Errors
///
/// Returns `ClusterError::DegenerateHistory` if there are no commits or they
/// all fall on the same day.
pub fn extract_commit_features(rows: &[CommitRecord]) -> Result<Vec<CommitFeatures>, ClusterError> {
    let earliest = rows.iter().map(|r| r.date).min();
    let latest = rows.iter().map(|r| r.date).max();
    let duration = match (earliest, latest) {
        (Some(earliest), Some(latest)) => days_between(earliest, latest),
        _ => 0,
    };
    if duration <= 0 {
        return Err(ClusterError::DegenerateHistory);
    }

    let mut authors: BTreeMap<&str, CommitColumns> = BTreeMap::new();
    for row in rows {
        let entry = authors.entry(row.author.as_str()).or_default();
        // Sums saturate at u64::MAX
        entry.num_commits = entry.num_commits.saturating_add(1);
        entry.num_files_changed = entry.num_files_changed.saturating_add(row.files_changed_count);
        entry.num_lines_added = entry.num_lines_added.saturating_add(row.lines_added);
        entry.num_lines_deleted = entry.num_lines_deleted.saturating_add(row.lines_deleted);
        entry.num_lines_changed = entry.num_lines_changed.saturating_add(row.lines_changed_total);
    }

    debug!(
        commits = rows.len(),
        authors = authors.len(),
        duration_days = duration,
        "Extracted commit features"
    );

    Ok(authors
        .into_iter()
        .map(|(name, mut columns)| {
            columns.commit_frequency = columns.num_commits as f64 / duration as f64;
            CommitFeatures {
                name: name.to_string(),
                columns,
            }
        })
        .collect())
}

/// Summarize issues per reporter
///
/// `num_opened` counts only issues whose state is exactly `"opened"`, so the
/// usual `"open"` state is not counted there.
#[must_use]
pub fn extract_issue_features(issues: &[IssueRecord]) -> Vec<IssueFeatures> {
    let mut authors: BTreeMap<&str, IssueColumns> = BTreeMap::new();
    for issue in issues {
        let entry = authors.entry(issue.author.as_str()).or_default();
        entry.num_issues += 1;
        if issue.is_opened() {
            entry.num_opened += 1;
        }
        if issue.is_closed() {
            entry.num_closed += 1;
        }
        entry.labels.merge(&issue.labels);
    }

    authors
        .into_iter()
        .map(|(name, columns)| IssueFeatures {
            name: name.to_string(),
            columns,
        })
        .collect()
}

/// Outer-join commit and issue features on author name
///
/// Authors missing from one side get zeros for that side's columns. With no
/// issue data (or an empty list) the table carries commit columns only.
#[must_use]
pub fn merge_features(commits: Vec<CommitFeatures>, issues: Option<Vec<IssueFeatures>>) -> FeatureTable {
    let issues = issues.filter(|i| !i.is_empty());
    let has_issue_features = issues.is_some();

    let mut merged: BTreeMap<String, (CommitColumns, Option<IssueColumns>)> = BTreeMap::new();
    for row in commits {
        let default_issues = has_issue_features.then(IssueColumns::default);
        merged.insert(row.name, (row.columns, default_issues));
    }
    for row in issues.into_iter().flatten() {
        let entry = merged
            .entry(row.name)
            .or_insert_with(|| (CommitColumns::default(), None));
        entry.1 = Some(row.columns);
    }

    FeatureTable {
        rows: merged
            .into_iter()
            .map(|(name, (commits, issues))| AuthorFeatureVector {
                name,
                commits,
                issues,
            })
            .collect(),
        has_issue_features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commitscope_history::date::normalize_date;
    use similar_asserts::assert_eq;

    fn commit(author: &str, date: &str, files: u64, added: u64) -> CommitRecord {
        CommitRecord {
            sha: format!("{author}-{date}"),
            author: author.to_string(),
            committer: author.to_string(),
            date: normalize_date(date).expect("date"),
            message: "change".to_string(),
            changed_files: (0..files).map(|i| format!("f{i}.rs")).collect(),
            files_changed_count: files,
            lines_added: added,
            lines_deleted: 1,
            lines_changed_total: added + 1,
        }
    }

    fn issue(author: &str, state: &str, labels: LabelCounts) -> IssueRecord {
        IssueRecord {
            author: author.to_string(),
            state: state.to_string(),
            labels,
        }
    }

    #[test]
    fn test_line_sums_saturate() {
        let huge = |date: &str| CommitRecord {
            lines_added: u64::MAX,
            lines_changed_total: u64::MAX,
            ..commit("alice", date, 1, 0)
        };
        let rows = vec![huge("01-03-2024"), huge("03-03-2024")];
        let features = extract_commit_features(&rows).expect("features");
        assert_eq!(features[0].columns.num_lines_added, u64::MAX);
        assert_eq!(features[0].columns.num_lines_changed, u64::MAX);
        assert_eq!(features[0].columns.num_lines_deleted, 2);
        assert_eq!(features[0].columns.num_commits, 2);
    }

    #[test]
    fn test_two_author_scenario() {
        let rows = vec![
            commit("alice", "01-03-2024", 1, 4),
            commit("bob", "02-03-2024", 2, 5),
            commit("alice", "03-03-2024", 1, 6),
        ];
        let features = extract_commit_features(&rows).expect("features");
        assert_eq!(features.len(), 2);

        let alice = &features[0];
        assert_eq!(alice.name.as_str(), "alice");
        assert_eq!(alice.columns.num_commits, 2);
        assert_eq!(alice.columns.num_lines_added, 10);
        assert_eq!(alice.columns.num_files_changed, 2);
        assert_eq!(alice.columns.num_lines_changed, 12);
        assert_eq!(alice.columns.commit_frequency, 1.0);

        let bob = &features[1];
        assert_eq!(bob.name.as_str(), "bob");
        assert_eq!(bob.columns.num_commits, 1);
        assert_eq!(bob.columns.num_lines_added, 5);
        assert_eq!(bob.columns.commit_frequency, 0.5);
    }

    #[test]
    fn test_frequency_uses_whole_repository_span() {
        // bob's own span is zero days but the repository spans four
        let rows = vec![
            commit("alice", "01-03-2024", 1, 1),
            commit("bob", "03-03-2024", 1, 1),
            commit("bob", "03-03-2024", 1, 1),
            commit("alice", "05-03-2024", 1, 1),
        ];
        let features = extract_commit_features(&rows).expect("features");
        assert_eq!(features[1].columns.commit_frequency, 0.5);
    }

    #[test]
    fn test_degenerate_history() {
        assert_eq!(
            extract_commit_features(&[]),
            Err(ClusterError::DegenerateHistory)
        );
        assert_eq!(
            extract_commit_features(&[commit("alice", "01-03-2024", 1, 1)]),
            Err(ClusterError::DegenerateHistory)
        );
        let same_day = vec![
            commit("alice", "01-03-2024", 1, 1),
            commit("bob", "01-03-2024", 1, 1),
        ];
        assert_eq!(
            extract_commit_features(&same_day),
            Err(ClusterError::DegenerateHistory)
        );
    }

    #[test]
    fn test_open_state_does_not_count_as_opened() {
        let issues = vec![
            issue("carol", "open", LabelCounts::default()),
            issue("carol", "opened", LabelCounts::default()),
            issue("carol", "closed", LabelCounts::default()),
        ];
        let features = extract_issue_features(&issues);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].columns.num_issues, 3);
        assert_eq!(features[0].columns.num_opened, 1);
        assert_eq!(features[0].columns.num_closed, 1);
    }

    #[test]
    fn test_issue_labels_accumulate() {
        let issues = vec![
            issue(
                "dave",
                "closed",
                LabelCounts {
                    bug: 1,
                    ..Default::default()
                },
            ),
            issue(
                "dave",
                "open",
                LabelCounts {
                    bug: 1,
                    enhancement: 1,
                    ..Default::default()
                },
            ),
        ];
        let features = extract_issue_features(&issues);
        assert_eq!(features[0].columns.labels.bug, 2);
        assert_eq!(features[0].columns.labels.enhancement, 1);
    }

    #[test]
    fn test_merge_is_outer_join_with_zeros() {
        let rows = vec![
            commit("alice", "01-03-2024", 1, 4),
            commit("bob", "03-03-2024", 1, 4),
        ];
        let commits = extract_commit_features(&rows).expect("features");
        let issues = extract_issue_features(&[
            issue("bob", "closed", LabelCounts::default()),
            issue("carol", "closed", LabelCounts::default()),
        ]);
        let table = merge_features(commits, Some(issues));

        assert!(table.has_issue_features);
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);

        assert_eq!(table.rows[0].issues, Some(IssueColumns::default()));
        assert_eq!(table.rows[1].issues.map(|i| i.num_closed), Some(1));
        assert_eq!(table.rows[2].commits, CommitColumns::default());
        assert!(table.matrix().iter().all(|r| r.len() == 14));
        assert_eq!(table.columns().len(), 14);
    }

    #[test]
    fn test_merge_without_issues_has_commit_columns_only() {
        let rows = vec![
            commit("alice", "01-03-2024", 1, 4),
            commit("bob", "03-03-2024", 1, 4),
        ];
        let commits = extract_commit_features(&rows).expect("features");
        for issues in [None, Some(Vec::new())] {
            let table = merge_features(commits.clone(), issues);
            assert!(!table.has_issue_features);
            assert!(table.rows.iter().all(|r| r.issues.is_none()));
            assert!(table.matrix().iter().all(|r| r.len() == 6));
        }
    }

    #[test]
    fn test_feature_row_serialization_is_flat() {
        let table = merge_features(
            vec![CommitFeatures {
                name: "alice".to_string(),
                columns: CommitColumns {
                    num_commits: 2,
                    ..Default::default()
                },
            }],
            None,
        );
        let json = serde_json::to_value(&table.rows[0]).expect("serialize");
        assert_eq!(json["name"], serde_json::json!("alice"));
        assert_eq!(json["num_commits"], serde_json::json!(2));
        assert!(json.get("num_issues").is_none());
    }
}
