// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Calendar date normalization
//!
//! Commit dates arrive either as ISO 8601 timestamps or already in the
//! `dd-mm-yyyy` form used by every emitted record. Search boundaries arrive
//! as `yyyy-mm-dd`. Both are reduced to a [`NaiveDate`] here.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::HistoryError;

/// Format of every date emitted in a record (`dd-mm-yyyy`)
pub const NORMALIZED_FORMAT: &str = "%d-%m-%Y";

/// Format accepted for search boundaries (`yyyy-mm-dd`)
pub const BOUNDARY_FORMAT: &str = "%Y-%m-%d";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f %z"];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Normalize a commit date to a calendar date
///
/// Strings already in `dd-mm-yyyy` form pass through. Anything else is
/// parsed as a timestamp and its calendar date (in the offset it was
/// written with) is kept.
///
/// # Errors
///
/// Returns `HistoryError::DateFormat` if the input matches none of the
/// accepted forms.
pub fn normalize_date(input: &str) -> Result<NaiveDate, HistoryError> {
    let trimmed = input.trim();
    if let Some(date) = parse_normalized(trimmed) {
        return Ok(date);
    }
    parse_timestamp(trimmed).ok_or_else(|| HistoryError::DateFormat {
        input: input.to_string(),
    })
}

/// Render a date in the normalized `dd-mm-yyyy` form
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(NORMALIZED_FORMAT).to_string()
}

/// Parse a search boundary given as `yyyy-mm-dd`
///
/// # Errors
///
/// Returns `HistoryError::InvalidBoundary` if the input is not exactly
/// `yyyy-mm-dd` or names a date that does not exist.
pub fn parse_boundary_date(input: &str) -> Result<NaiveDate, HistoryError> {
    let trimmed = input.trim();
    if !has_shape(trimmed, &[4, 7]) {
        return Err(HistoryError::InvalidBoundary {
            input: input.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, BOUNDARY_FORMAT).map_err(|_| HistoryError::InvalidBoundary {
        input: input.to_string(),
    })
}

/// Whole days from `earliest` to `latest`
#[must_use]
pub fn days_between(earliest: NaiveDate, latest: NaiveDate) -> i64 {
    (latest - earliest).num_days()
}

fn parse_normalized(s: &str) -> Option<NaiveDate> {
    if !has_shape(s, &[2, 5]) {
        return None;
    }
    NaiveDate::parse_from_str(s, NORMALIZED_FORMAT).ok()
}

fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.date_naive());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, BOUNDARY_FORMAT).ok()
}

/// Ten characters, ASCII digits everywhere except `-` at the given positions
fn has_shape(s: &str, dashes: &[usize]) -> bool {
    s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| {
            if dashes.contains(&i) {
                b == b'-'
            } else {
                b.is_ascii_digit()
            }
        })
}

/// Serde adapter storing a [`NaiveDate`] as `dd-mm-yyyy`
///
/// Deserialization accepts every form [`normalize_date`] accepts.
pub mod normalized {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `dd-mm-yyyy`
    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    /// Deserialize from a normalized or ISO 8601 string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::normalize_date(&raw).map_err(serde::de::Error::custom)
    }
}
