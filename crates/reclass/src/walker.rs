// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output tree enumeration with extension filtering.
//!
//! Build output is walked verbatim: no gitignore semantics, hidden
//! files included. Only the extension allow-list decides which files
//! the rewrite pass may open.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::Error;

/// One file under the output root eligible for rewriting.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Recursive walker keeping files whose extension is allowed.
pub struct OutputWalker {
    allow: GlobSet,
}

impl OutputWalker {
    /// Build the allow-list from bare extensions (`"html"`, `"js"`).
    pub fn new(target_ext: &[String]) -> Result<Self, Error> {
        let mut builder = GlobSetBuilder::new();
        for ext in target_ext {
            let glob = Glob::new(&format!("*.{ext}")).map_err(|e| {
                Error::config(format!("invalid target extension {ext:?}: {e}"))
            })?;
            builder.add(glob);
        }
        let allow = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build extension filter: {e}")))?;
        Ok(Self { allow })
    }

    /// Collect every eligible file under `root`, recursively.
    ///
    /// A missing root or any enumeration failure aborts with
    /// [`Error::OutputUnavailable`]. Files already rewritten by a
    /// caller stay rewritten; there is no rollback.
    pub fn collect(&self, root: &Path) -> Result<Vec<OutputFile>, Error> {
        let meta = fs::metadata(root)
            .map_err(|source| Error::OutputUnavailable { path: root.to_path_buf(), source })?;
        if !meta.is_dir() {
            return Err(Error::OutputUnavailable {
                path: root.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "output root is not a directory"),
            });
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(root).standard_filters(false).build() {
            let entry = entry.map_err(|e| Error::OutputUnavailable {
                path: root.to_path_buf(),
                source: into_io_error(e),
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if !self.allow.is_match(Path::new(entry.file_name())) {
                continue;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(OutputFile { path: entry.into_path(), size });
        }
        Ok(files)
    }
}

fn into_io_error(err: ignore::Error) -> io::Error {
    let message = err.to_string();
    err.into_io_error().unwrap_or_else(|| io::Error::other(message))
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
