// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for rename fragments produced during compilation.
//!
//! Compilation units run concurrently and coordinate only through the
//! filesystem: each [`MapStore::put`] is self-contained, and fragment
//! files are named by a hash of their contents so identical fragments
//! collapse to one artifact and same-name writes are idempotent. The
//! store is transient build state: [`MapStore::reset`] runs before
//! compilation and again after the rewrite pass, success or not.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::Error;

/// Mapping from original class identifier to its shortened replacement.
///
/// An ordered map keeps serialization deterministic (stable content
/// hashes) and gives merging and engine construction a reproducible
/// iteration order.
pub type RenameMap = BTreeMap<String, String>;

const FRAGMENT_PREFIX: &str = "class-map-";

/// Handle to one fragment directory.
///
/// The directory's lifecycle is explicit: whoever owns the handle owns
/// creation and teardown. Nothing in this crate assumes a well-known
/// process-wide path.
#[derive(Debug, Clone)]
pub struct MapStore {
    root: PathBuf,
}

impl MapStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Best-effort recursive delete of the store.
    ///
    /// A missing directory is success: an absent store already means
    /// "no prior renames". Other failures are logged and swallowed.
    pub fn reset(&self) {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("failed to remove class map store {}: {}", self.root.display(), e);
            }
        }
    }

    /// Persist one fragment under its content hash.
    ///
    /// Creates the store directory on first use. Returns the path the
    /// fragment landed at; a failure must reach the caller so rename
    /// data is never lost silently.
    pub fn put(&self, map: &RenameMap) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.root).map_err(|source| Error::StorageUnavailable {
            path: self.root.clone(),
            source,
        })?;

        // BTreeMap serializes key-sorted, so equal maps produce equal
        // bytes and therefore equal fragment names.
        let bytes = serde_json::to_vec(map).map_err(|e| Error::StorageUnavailable {
            path: self.root.clone(),
            source: io::Error::other(e),
        })?;
        let digest = Sha256::digest(&bytes);
        let path = self.root.join(format!("{FRAGMENT_PREFIX}{digest:x}.json"));

        fs::write(&path, &bytes)
            .map_err(|source| Error::StorageUnavailable { path: path.clone(), source })?;
        Ok(path)
    }

    /// Enumerate every fragment and fold them into one map.
    ///
    /// Key collisions resolve to the later fragment in sorted-filename
    /// order. Filesystem enumeration order is platform-dependent, so
    /// the fold sorts first to keep merge results reproducible.
    pub fn merge_all(&self) -> Result<RenameMap, Error> {
        let mut fragments = Vec::new();
        match collect_files(&self.root, &mut fragments) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NoRenameData { path: self.root.clone() });
            }
            Err(source) => {
                return Err(Error::StorageUnavailable { path: self.root.clone(), source });
            }
        }
        if fragments.is_empty() {
            return Err(Error::NoRenameData { path: self.root.clone() });
        }
        fragments.sort();

        let mut merged = RenameMap::new();
        for path in fragments {
            let bytes = fs::read(&path)
                .map_err(|source| Error::StorageUnavailable { path: path.clone(), source })?;
            let fragment: RenameMap = serde_json::from_slice(&bytes)
                .map_err(|source| Error::MalformedFragment { path: path.clone(), source })?;
            merged.extend(fragment);
        }
        Ok(merged)
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            collect_files(&entry.path(), out)?;
        } else {
            out.push(entry.path());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
