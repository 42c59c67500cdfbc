// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! commitscope-cluster: contributor grouping for commitscope
//!
//! This library crate summarizes commit and issue history into one numeric
//! feature row per author and partitions the authors with k-means.

#![warn(missing_docs)]

pub mod error;
pub mod features;
pub mod kmeans;

pub use error::ClusterError;
pub use features::{
    AuthorFeatureVector, CommitColumns, CommitFeatures, FeatureTable, IssueColumns, IssueFeatures,
    extract_commit_features, extract_issue_features, merge_features,
};
pub use kmeans::{ClusterAssignment, KMeansConfig, check_population, cluster, parse_cluster_count};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::ClusterError;
    pub use crate::features::{FeatureTable, extract_commit_features, extract_issue_features, merge_features};
    pub use crate::kmeans::{ClusterAssignment, KMeansConfig, cluster};
}
