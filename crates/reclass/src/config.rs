// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline configuration.
//!
//! Supplied by the build orchestrator, not discovered from disk. The
//! struct derives `Deserialize` so an orchestrator can embed it in its
//! own config file; every field has a default, and validation runs
//! eagerly in [`crate::pipeline::RenamePipeline::new`] so a bad setup
//! fails at startup instead of mid-pass.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Error;
use crate::pattern::{BoundaryPolicy, ClassPattern};

/// Default fragment directory, relative to the build's working
/// directory.
pub const DEFAULT_STORE_DIR: &str = "./class-maps";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// File extensions eligible for rewriting.
    pub target_ext: Vec<String>,
    /// Token boundary policy used when matching class identifiers.
    pub boundary: BoundaryPolicy,
    /// Directory holding rename fragments between compilation and
    /// finalize.
    pub store_dir: PathBuf,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            target_ext: default_target_ext(),
            boundary: BoundaryPolicy::default(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

fn default_target_ext() -> Vec<String> {
    vec!["html".to_string(), "js".to_string()]
}

impl RenameConfig {
    /// Reject contradictions before any compilation output exists.
    pub fn validate(&self) -> Result<(), Error> {
        if self.target_ext.is_empty() {
            return Err(Error::config("target_ext must list at least one extension"));
        }
        for ext in &self.target_ext {
            if ext.is_empty() || ext.contains(['.', '/', '\\', '*']) {
                return Err(Error::config(format!(
                    "invalid target extension {ext:?}: expected a bare extension like \"html\""
                )));
            }
        }
        if self.store_dir.as_os_str().is_empty() {
            return Err(Error::config("store_dir must not be empty"));
        }
        // Compile a probe pattern so a boundary policy that cannot form
        // a valid matcher surfaces here, not halfway through a pass.
        ClassPattern::compile(&self.boundary, "a")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
