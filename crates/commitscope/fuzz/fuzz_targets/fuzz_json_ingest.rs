// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for ingesting arbitrary JSON
//!
//! Any JSON array handed to `ingest` is either partly ingested or rejected;
//! a search afterwards must never panic.

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use serde_json::Value;

use commitscope::service::{SearchRequest, Service};
use commitscope_history::CommitStore;

fuzz_target!(|data: &[u8]| {
    if let Ok(Value::Array(raw)) = serde_json::from_slice::<Value>(data) {
        let service = Service::new(Arc::new(CommitStore::new()));
        if service.ingest("fuzz", &raw).is_ok() {
            let _ = service.search(&SearchRequest::new("fuzz"));
            let _ = service.group("fuzz", Some(raw.as_slice()), "2");
        }
    }
});
