// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for raw commit and issue record parsing
//!
//! Feeds arbitrary JSON values to `parse_commit_value` and
//! `parse_issue_value`, which must reject bad shapes without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;

use commitscope_history::{parse_commit_value, parse_issue_value};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = parse_commit_value(&value);
        let _ = parse_issue_value(&value);
    }
});
