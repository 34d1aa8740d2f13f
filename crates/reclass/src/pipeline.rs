// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Build lifecycle orchestration: reset, record fragments, finalize.
//!
//! The orchestrator's contract is strict ordering: [`RenamePipeline::begin`]
//! before compilation starts, any number of
//! [`RenamePipeline::record_fragment`] calls while it runs, and
//! [`RenamePipeline::finalize`] exactly once after every output file is
//! on disk. The pipeline does not enforce that ordering; it trusts the
//! build tool that drives it.

use std::path::Path;

use crate::config::RenameConfig;
use crate::error::Error;
use crate::report::{RewriteObserver, SavingsReport};
use crate::rewrite::rewrite_outputs;
use crate::store::{MapStore, RenameMap};

/// Result of the finalize phase.
///
/// Typed instead of thrown: renaming is a side effect of the build, and
/// the orchestrator, not this crate, decides whether a failed pass
/// stops anything.
#[derive(Debug)]
pub enum FinalizeOutcome {
    /// Output files were processed; savings attached.
    Rewritten(SavingsReport),
    /// Compilation produced no rename data; the output tree was left
    /// untouched.
    NothingToDo,
    /// The pass aborted. Files rewritten before the failure stay
    /// rewritten; there is no rollback.
    Failed(Error),
}

/// The lifecycle context threaded through compilation and finalize.
pub struct RenamePipeline {
    config: RenameConfig,
    store: MapStore,
    observers: Vec<Box<dyn RewriteObserver>>,
}

impl RenamePipeline {
    /// Validates the configuration eagerly; a bad setup fails here,
    /// before the CSS pipeline produces a single fragment.
    pub fn new(config: RenameConfig) -> Result<Self, Error> {
        config.validate()?;
        let store = MapStore::new(config.store_dir.clone());
        Ok(Self { config, store, observers: Vec::new() })
    }

    /// Register an observer. Observers are notified in registration
    /// order.
    pub fn add_observer(&mut self, observer: Box<dyn RewriteObserver>) {
        self.observers.push(observer);
    }

    pub fn store(&self) -> &MapStore {
        &self.store
    }

    /// Discard fragments left over from a previous build. Runs before
    /// compilation starts.
    pub fn begin(&self) {
        self.store.reset();
    }

    /// Record one compilation unit's rename fragment.
    ///
    /// Safe to call concurrently from parallel compilation units; all
    /// coordination happens through the store's filesystem layout. A
    /// failed write is reported loudly but does not stop the build.
    /// Observers are skipped in that case so they never see a fragment
    /// that was not persisted.
    pub fn record_fragment(&self, map: &RenameMap) {
        if let Err(e) = self.store.put(map) {
            tracing::warn!("class rename fragment was not saved: {e}");
            return;
        }
        for observer in &self.observers {
            if let Err(e) = observer.fragment_recorded(map) {
                tracing::warn!("fragment observer failed: {e}");
            }
        }
    }

    /// Merge all fragments, rewrite the output tree, report savings,
    /// and clear the store.
    ///
    /// Every failure is caught, logged with a distinguishing message,
    /// and returned as a typed outcome; nothing propagates into the
    /// surrounding build. The store is cleared whatever happens; the
    /// fragments are transient state of exactly one build.
    pub fn finalize(&self, output_root: &Path) -> FinalizeOutcome {
        let outcome = match self.try_finalize(output_root) {
            Ok(report) => FinalizeOutcome::Rewritten(report),
            Err(Error::NoRenameData { path }) => {
                tracing::info!(
                    "no class rename data under {}; output left untouched",
                    path.display(),
                );
                FinalizeOutcome::NothingToDo
            }
            Err(e) => {
                tracing::error!("class reference rewrite aborted: {e}");
                FinalizeOutcome::Failed(e)
            }
        };
        self.store.reset();
        outcome
    }

    fn try_finalize(&self, output_root: &Path) -> Result<SavingsReport, Error> {
        let merged = self.store.merge_all()?;
        let report = rewrite_outputs(&merged, &self.config, output_root)?;

        for savings in report.files() {
            for observer in &self.observers {
                if let Err(e) = observer.file_rewritten(savings) {
                    tracing::warn!("rewrite observer failed: {e}");
                }
            }
        }
        for observer in &self.observers {
            if let Err(e) = observer.pass_complete(&report) {
                tracing::warn!("rewrite observer failed: {e}");
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
