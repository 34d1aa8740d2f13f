// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Build-time CSS class reference rewriter.
//!
//! After a CSS pipeline shortens class names (`.tall-image` becomes
//! `.a`), the HTML and JS the build emitted still reference the
//! originals. This crate closes the gap at the end of the build:
//! compilation units drop their rename maps into a [`MapStore`], and
//! once every output file is on disk, [`RenamePipeline::finalize`]
//! merges the fragments, rewrites each eligible file in a single
//! boundary-safe pass, reports the bytes saved, and discards the store.
//!
//! There is no CLI; the crate is driven as a build lifecycle hook:
//!
//! ```no_run
//! use std::path::Path;
//! use reclass::{ConsoleReporter, RenameConfig, RenameMap, RenamePipeline};
//!
//! # fn main() -> Result<(), reclass::Error> {
//! let mut pipeline = RenamePipeline::new(RenameConfig::default())?;
//! pipeline.add_observer(Box::new(ConsoleReporter::default()));
//!
//! // Before compilation starts.
//! pipeline.begin();
//!
//! // Once per CSS-bearing compilation unit, from the shortener.
//! let mut fragment = RenameMap::new();
//! fragment.insert("tall-image".to_string(), "a".to_string());
//! pipeline.record_fragment(&fragment);
//!
//! // After the build wrote its last output file.
//! let outcome = pipeline.finalize(Path::new("dist"));
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod report;
pub mod rewrite;
pub mod store;
pub mod walker;

#[cfg(test)]
pub mod test_utils;

pub use config::{DEFAULT_STORE_DIR, RenameConfig};
pub use error::Error;
pub use pattern::{BoundaryPolicy, ClassPattern};
pub use pipeline::{FinalizeOutcome, RenamePipeline};
pub use report::{ConsoleReporter, FileSavings, RewriteObserver, SavingsReport};
pub use rewrite::RenameEngine;
pub use store::{MapStore, RenameMap};
