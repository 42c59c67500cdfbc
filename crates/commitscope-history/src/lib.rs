// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! commitscope-history: commit and issue history for commitscope
//!
//! This library crate parses raw commit and issue records into typed rows,
//! keeps per-repository commit tables in memory, and answers filtered
//! searches over them.

#![warn(missing_docs)]

//! # Example
//!
//! ```
//! use commitscope_history::{CommitStore, SearchQuery, parse_commit_value, search};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "sha": "1945ab9c752534e733c38ba0109dc3b741f0a6eb",
//!     "commit": {
//!         "author": { "name": "alice", "date": "2024-03-01T09:00:00Z" },
//!         "committer": { "name": "alice" },
//!         "message": "fix bug"
//!     },
//!     "files": [{ "filename": "src/lib.rs" }],
//!     "stats": { "additions": 3, "deletions": 1, "total": 4 }
//! });
//!
//! let store = CommitStore::new();
//! store.put("demo", vec![parse_commit_value(&raw).expect("parse")]);
//!
//! let table = store.get("demo").expect("table");
//! let outcome = search(&table, &SearchQuery::all().message("fix"), None).expect("search");
//! assert_eq!(outcome.len(), 1);
//! assert_eq!(outcome.hits()[0].record.formatted_date(), "01-03-2024");
//! ```

pub mod date;
pub mod error;
pub mod record;
pub mod search;
pub mod sentiment;
pub mod table;

pub use error::HistoryError;
pub use record::{
    CommitRecord, IssueRecord, KnownLabel, LabelCounts, RawCommit, RawIssue, parse_commit,
    parse_commit_value, parse_issue, parse_issue_value,
};
pub use search::{DateRange, SearchHit, SearchOutcome, SearchQuery, search};
pub use sentiment::{SentimentClassifier, SentimentError, SentimentScore};
pub use table::{CommitStore, CommitTable};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::HistoryError;
    pub use crate::record::{CommitRecord, IssueRecord};
    pub use crate::search::{SearchOutcome, SearchQuery, search};
    pub use crate::sentiment::SentimentClassifier;
    pub use crate::table::CommitStore;
}
