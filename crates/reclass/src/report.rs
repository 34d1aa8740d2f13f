// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Savings accounting and progress reporting.

use std::io::Write;
use std::path::PathBuf;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::store::RenameMap;

/// Byte counts for one rewritten file.
#[derive(Debug, Clone)]
pub struct FileSavings {
    /// Path relative to the output root.
    pub path: PathBuf,
    pub old_size: u64,
    pub new_size: u64,
}

impl FileSavings {
    /// Percent reduction, truncated toward zero. A zero-byte original
    /// reports 0.
    pub fn percent_reduction(&self) -> i64 {
        calculate_percent(self.old_size, self.new_size)
    }

    /// Bytes saved; negative when the rewrite grew the file.
    pub fn saved(&self) -> i64 {
        self.old_size as i64 - self.new_size as i64
    }
}

/// Accumulated totals for one rewrite pass. Lives only for the
/// duration of the pass; never persisted.
#[derive(Debug, Default)]
pub struct SavingsReport {
    files: Vec<FileSavings>,
    total_saved: i64,
}

impl SavingsReport {
    pub fn add(&mut self, savings: FileSavings) {
        self.total_saved += savings.saved();
        self.files.push(savings);
    }

    pub fn files(&self) -> &[FileSavings] {
        &self.files
    }

    /// Running total of bytes saved across all processed files.
    pub fn total_saved(&self) -> i64 {
        self.total_saved
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// `100 − (after / before) × 100`, truncated toward zero.
pub fn calculate_percent(before: u64, after: u64) -> i64 {
    if before == 0 {
        return 0;
    }
    (100.0 - (after as f64 / before as f64) * 100.0) as i64
}

/// Bytes in human-readable form.
pub fn human_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn signed_bytes(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", human_bytes(bytes.unsigned_abs()))
    } else {
        human_bytes(bytes.unsigned_abs())
    }
}

/// Build-lifecycle hooks notified as the pipeline progresses.
///
/// Observers run in registration order. A failing observer is logged
/// and never stops the pass.
pub trait RewriteObserver: Send + Sync {
    /// A rename fragment was recorded during compilation.
    fn fragment_recorded(&self, _map: &RenameMap) -> anyhow::Result<()> {
        Ok(())
    }

    /// One output file finished rewriting.
    fn file_rewritten(&self, _savings: &FileSavings) -> anyhow::Result<()> {
        Ok(())
    }

    /// The pass finished; totals are final.
    fn pass_complete(&self, _report: &SavingsReport) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Prints per-file progress lines and a final total to stdout.
pub struct ConsoleReporter {
    choice: ColorChoice,
}

impl ConsoleReporter {
    pub fn new(choice: ColorChoice) -> Self {
        Self { choice }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

impl RewriteObserver for ConsoleReporter {
    fn file_rewritten(&self, savings: &FileSavings) -> anyhow::Result<()> {
        let mut out = StandardStream::stdout(self.choice);
        writeln!(
            out,
            "Processed: {} (reduced {}% of original {}) of {}.",
            human_bytes(savings.new_size),
            savings.percent_reduction(),
            human_bytes(savings.old_size),
            savings.path.display(),
        )?;
        Ok(())
    }

    fn pass_complete(&self, report: &SavingsReport) -> anyhow::Result<()> {
        let mut out = StandardStream::stdout(self.choice);
        writeln!(out)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "Total saved {}.", signed_bytes(report.total_saved()))?;
        out.reset()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
