// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the rename pipeline.
//!
//! Everything here is recoverable from the surrounding build's point of
//! view; [`crate::pipeline::RenamePipeline::finalize`] is the boundary
//! that catches, logs, and converts these into a typed outcome.

use std::io;
use std::path::PathBuf;

/// Errors surfaced by the map store, the output walker, and the
/// rewrite pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The fragment store could not be created, read, or written.
    #[error("class map store unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No fragments existed at merge time. The rewrite pass has nothing
    /// to work with; the pipeline treats this as a clean no-op rather
    /// than a failure.
    #[error("no class rename data found under {}", .path.display())]
    NoRenameData { path: PathBuf },

    /// A fragment file exists but does not parse as a flat string map.
    /// Aborts the merge rather than folding a partial view.
    #[error("malformed class map fragment {}: {source}", .path.display())]
    MalformedFragment {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The build output root is missing or cannot be enumerated. Files
    /// rewritten before the failure stay rewritten.
    #[error("output directory inaccessible at {}: {source}", .path.display())]
    OutputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid configuration, reported before any file is touched.
    #[error("invalid rename configuration: {reason}")]
    Configuration { reason: String },
}

impl Error {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Error::Configuration { reason: reason.into() }
    }
}
