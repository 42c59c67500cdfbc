// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for search and group requests
//!
//! Arbitrary filter strings, boundary dates and cluster counts must be
//! rejected or answered without panicking.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::json;

use commitscope::service::{SearchRequest, Service};
use commitscope_history::CommitStore;

#[derive(Debug, Arbitrary)]
struct Input {
    sha: Option<String>,
    author: Option<String>,
    committer: Option<String>,
    message: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    clusters: String,
}

fn populated_service() -> Service {
    let service = Service::new(Arc::new(CommitStore::new()));
    let raw = vec![
        json!({
            "sha": "a1",
            "commit": {
                "author": { "name": "alice", "date": "2024-03-01T10:00:00Z" },
                "committer": { "name": "alice" },
                "message": "fix bug"
            }
        }),
        json!({
            "sha": "b2",
            "commit": {
                "author": { "name": "bob", "date": "2024-03-05T10:00:00Z" },
                "committer": { "name": "bob" },
                "message": "add feature"
            }
        }),
    ];
    let _ = service.ingest("fuzz", &raw);
    service
}

fuzz_target!(|input: Input| {
    let service = populated_service();

    let request = SearchRequest {
        sha: input.sha,
        author: input.author,
        committer: input.committer,
        message: input.message,
        start_date: input.start_date,
        end_date: input.end_date,
        ..SearchRequest::new("fuzz")
    };
    let _ = service.search(&request);

    let _ = service.group("fuzz", None, &input.clusters);
});
