// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Sentiment classification through an external program
//!
//! The program receives one commit message on stdin and must print a JSON
//! list of `{"label": ..., "score": ...}` objects, best label first.
//! Stdin is written from a separate thread while stdout is drained, so the
//! program may print before it has read its whole input.

use std::io::{ErrorKind, Write};
use std::process::{ChildStdin, Command, Stdio};

use commitscope_history::{SentimentClassifier, SentimentError, SentimentScore};
use tracing::debug;

/// Runs a configured command once per message
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
}

impl CommandClassifier {
    /// Create a classifier running `program` with `args`
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The program that will be run
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SentimentClassifier for CommandClassifier {
    fn classify(&self, text: &str) -> Result<Vec<SentimentScore>, SentimentError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SentimentError::Unavailable(format!("{}: {e}", self.program)))?;

        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || write_message(stdin, text));
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        written.map_err(|_| SentimentError::Unavailable("stdin writer panicked".to_string()))??;
        let output = output.map_err(|e| SentimentError::Unavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SentimentError::Unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let ranking: Vec<SentimentScore> = serde_json::from_slice(&output.stdout)
            .map_err(|e| SentimentError::InvalidOutput(e.to_string()))?;
        debug!(program = %self.program, labels = ranking.len(), "Classified message");
        Ok(ranking)
    }
}

/// Feed `text` to the child and close its stdin
fn write_message(stdin: Option<ChildStdin>, text: &str) -> Result<(), SentimentError> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(text.as_bytes()) {
        Ok(()) => Ok(()),
        // Child exited early; its status is checked by the caller
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(SentimentError::Unavailable(e.to_string())),
    }
}
