// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI tests for commitscope flags and subcommands
//!
//! These tests verify argument parsing, global flag placement, logging
//! level determination and the mapping from flags to service requests.

use clap::Parser;
use commitscope::config::{Command, Config};
use commitscope::service::SearchRequest;
use std::path::PathBuf;
use tracing::Level;

// ============================================================================
// Logging flag tests
// ============================================================================

#[test]
fn test_verbose_short_flag_v() {
    let config = Config::try_parse_from(["commitscope", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert!(!config.quiet);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_quiet_long_flag() {
    let config = Config::try_parse_from(["commitscope", "--quiet"]).expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_verbose_wins_over_quiet() {
    let config = Config::try_parse_from(["commitscope", "-v", "-q"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_verbose_flag_value_syntax_not_supported() {
    let result = Config::try_parse_from(["commitscope", "--verbose=true"]);
    assert!(result.is_err(), "Boolean flags don't support =value syntax");
}

#[test]
fn test_default_log_level_info() {
    let config = Config::try_parse_from(["commitscope"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::INFO);
    assert!(config.command.is_none());
}

// ============================================================================
// Global option tests
// ============================================================================

#[test]
fn test_short_and_long_source_dir_equivalent() {
    let short = Config::try_parse_from(["commitscope", "-s", "/data"]).expect("short parse");
    let long = Config::try_parse_from(["commitscope", "--source-dir", "/data"]).expect("long parse");
    assert_eq!(short.source_dir, long.source_dir);
    assert_eq!(short.source_path(), PathBuf::from("/data"));
}

#[test]
fn test_global_flags_after_subcommand() {
    let config = Config::try_parse_from([
        "commitscope",
        "ingest",
        "demo",
        "--source-dir",
        "/data",
        "-v",
    ])
    .expect("parse should succeed");
    assert_eq!(config.source_dir, Some(PathBuf::from("/data")));
    assert!(config.verbose);
}

#[test]
fn test_kmeans_defaults() {
    let config = Config::try_parse_from(["commitscope"]).expect("parse should succeed");
    assert_eq!(config.seed, 0);
    assert_eq!(config.max_iterations, 300);
    let kmeans = config.kmeans();
    assert_eq!(kmeans.seed, 0);
    assert_eq!(kmeans.max_iterations, 300);
}

#[test]
fn test_kmeans_overrides() {
    let config = Config::try_parse_from([
        "commitscope",
        "--seed",
        "9",
        "--max-iterations",
        "50",
    ])
    .expect("parse should succeed");
    assert_eq!(config.kmeans().seed, 9);
    assert_eq!(config.kmeans().max_iterations, 50);
}

#[test]
fn test_classifier_flag() {
    let config = Config::try_parse_from(["commitscope", "--classifier", "python3 finbert.py"])
        .expect("parse should succeed");
    let (program, args) = config.classifier_command().expect("classifier");
    assert_eq!(program, "python3");
    assert_eq!(args, vec!["finbert.py".to_string()]);
}

// ============================================================================
// Subcommand tests
// ============================================================================

#[test]
fn test_ingest_subcommand() {
    let config = Config::try_parse_from(["commitscope", "ingest", "demo"]).expect("parse");
    match config.command {
        Some(Command::Ingest { repo }) => assert_eq!(repo, "demo"),
        other => panic!("Expected ingest, got {other:?}"),
    }
}

#[test]
fn test_ingest_requires_repo() {
    assert!(Config::try_parse_from(["commitscope", "ingest"]).is_err());
}

#[test]
fn test_search_subcommand_to_request() {
    let config = Config::try_parse_from([
        "commitscope",
        "search",
        "demo",
        "--author",
        "alice",
        "-m",
        "fix",
        "--start-date",
        "2024-03-01",
        "--sentiment",
    ])
    .expect("parse");
    let Some(Command::Search(args)) = config.command else {
        panic!("Expected search");
    };
    let request = SearchRequest::from(&args);
    assert_eq!(request.repo, "demo");
    assert_eq!(request.author.as_deref(), Some("alice"));
    assert_eq!(request.message.as_deref(), Some("fix"));
    assert_eq!(request.start_date.as_deref(), Some("2024-03-01"));
    assert!(request.end_date.is_none());
    assert!(request.with_sentiment);
}

#[test]
fn test_search_without_filters() {
    let config = Config::try_parse_from(["commitscope", "search", "demo"]).expect("parse");
    let Some(Command::Search(args)) = config.command else {
        panic!("Expected search");
    };
    let request = SearchRequest::from(&args);
    assert_eq!(request, SearchRequest::new("demo"));
}

#[test]
fn test_group_subcommand() {
    let config = Config::try_parse_from(["commitscope", "group", "demo", "-k", "3", "--no-issues"])
        .expect("parse");
    match config.command {
        Some(Command::Group {
            repo,
            clusters,
            no_issues,
        }) => {
            assert_eq!(repo, "demo");
            assert_eq!(clusters, "3");
            assert!(no_issues);
        }
        other => panic!("Expected group, got {other:?}"),
    }
}

#[test]
fn test_group_requires_clusters() {
    assert!(Config::try_parse_from(["commitscope", "group", "demo"]).is_err());
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(Config::try_parse_from(["commitscope", "serve"]).is_err());
}
