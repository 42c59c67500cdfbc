// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! commitscope: search commit history and group contributors
//!
//! This binary crate loads raw repository history from a directory, answers
//! filtered commit searches and groups contributors with k-means. Results
//! are printed as JSON on stdout; logs go to stderr.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::debug;

use commitscope::app;
use commitscope::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = config.command.as_ref() else {
        Config::command()
            .print_help()
            .context("Failed to print help")?;
        return Ok(());
    };

    debug!(source = %config.source_path().display(), "Running command");

    let stdout = std::io::stdout();
    app::execute(&config, command, &mut stdout.lock()).context("commitscope failed")?;
    Ok(())
}
