// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! commitscope library
//!
//! This module exports the service layer, content sources, the external
//! sentiment classifier and configuration for use in integration tests and
//! as a library.

pub mod app;
pub mod classifier;
pub mod config;
pub mod service;
pub mod source;
