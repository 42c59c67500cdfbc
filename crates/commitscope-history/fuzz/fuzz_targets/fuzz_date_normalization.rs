// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for commit date normalization and boundary parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

use commitscope_history::date::{format_date, normalize_date, parse_boundary_date};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Neither parser should panic on any input
        if let Ok(date) = normalize_date(input) {
            let _ = normalize_date(&format_date(date));
        }
        let _ = parse_boundary_date(input);
    }
});
