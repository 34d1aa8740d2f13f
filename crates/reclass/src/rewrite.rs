// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The rewrite pass: apply a merged rename map to build output.
//!
//! Replacement runs as a single sweep per file. All original
//! identifiers go into one leftmost-longest Aho-Corasick automaton;
//! candidate occurrences are boundary-checked against the original
//! content without consuming the boundary characters. Compared with
//! applying one regex per identifier over progressively mutated text,
//! this closes two holes at once: a replacement can never produce text
//! that a later identifier matches, and adjacent occurrences separated
//! by a single boundary character are all rewritten.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use aho_corasick::{AhoCorasick, MatchKind};
use memmap2::Mmap;
use rayon::prelude::*;

use crate::config::RenameConfig;
use crate::error::Error;
use crate::pattern::BoundaryPolicy;
use crate::report::{FileSavings, SavingsReport};
use crate::store::RenameMap;
use crate::walker::{OutputFile, OutputWalker};

/// Files at or above this size are memory-mapped instead of read whole.
const MMAP_THRESHOLD: u64 = 64 * 1024;

/// Single-pass replacement engine over every identifier in a map.
pub struct RenameEngine {
    automaton: AhoCorasick,
    renamed: Vec<String>,
    policy: BoundaryPolicy,
}

impl RenameEngine {
    /// Compile the map. Identifier keys must be non-empty; an empty
    /// key would match everywhere.
    pub fn new(map: &RenameMap, policy: BoundaryPolicy) -> Result<Self, Error> {
        if map.keys().any(|k| k.is_empty()) {
            return Err(Error::config("rename map contains an empty identifier"));
        }
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(map.keys())
            .map_err(|e| Error::config(format!("failed to build match automaton: {e}")))?;
        // BTreeMap iteration is ordered, so values()[i] pairs with the
        // automaton's pattern i built from keys().
        Ok(Self { automaton, renamed: map.values().cloned().collect(), policy })
    }

    /// Rewrite `input`, returning the new text when anything matched.
    pub fn rewrite(&self, input: &str) -> Option<String> {
        let mut out: Option<String> = None;
        let mut last = 0;
        for m in self.automaton.find_iter(input) {
            if self.is_joined(input, m.start(), m.end()) {
                continue;
            }
            let out = out.get_or_insert_with(|| String::with_capacity(input.len()));
            out.push_str(&input[last..m.start()]);
            out.push_str(&self.renamed[m.pattern().as_usize()]);
            last = m.end();
        }
        let mut out = out?;
        out.push_str(&input[last..]);
        Some(out)
    }

    /// True when the candidate match at `start..end` is glued to a
    /// neighbouring token and must be left alone.
    fn is_joined(&self, input: &str, start: usize, end: usize) -> bool {
        input[..start].chars().next_back().is_some_and(|c| self.policy.binds_before(c))
            || input[end..].chars().next().is_some_and(|c| self.policy.binds_after(c))
    }
}

/// Apply `map` to every eligible file under `root`.
///
/// Files are independent, so the loop runs on the rayon pool. A
/// per-file I/O failure skips that file with a warning (the atomic
/// write below guarantees it was either fully rewritten or untouched)
/// while an enumeration failure aborts the whole pass.
pub fn rewrite_outputs(
    map: &RenameMap,
    config: &RenameConfig,
    root: &Path,
) -> Result<SavingsReport, Error> {
    let engine = RenameEngine::new(map, config.boundary.clone())?;
    let walker = OutputWalker::new(&config.target_ext)?;
    let files = walker.collect(root)?;
    tracing::debug!(
        "rewriting {} identifiers across {} candidate files under {}",
        map.len(),
        files.len(),
        root.display(),
    );

    let outcomes: Vec<Option<FileSavings>> = files
        .par_iter()
        .map(|file| match rewrite_file(&engine, root, file) {
            Ok(savings) => savings,
            Err(e) => {
                tracing::warn!("failed to rewrite {}: {}", file.path.display(), e);
                None
            }
        })
        .collect();

    let mut report = SavingsReport::default();
    for savings in outcomes.into_iter().flatten() {
        report.add(savings);
    }
    Ok(report)
}

/// Rewrite one file in place. Returns `None` for files that were
/// skipped (non-UTF-8 content).
fn rewrite_file(
    engine: &RenameEngine,
    root: &Path,
    file: &OutputFile,
) -> io::Result<Option<FileSavings>> {
    let source = read_source(&file.path)?;
    let Some(text) = source.as_str() else {
        tracing::warn!("skipping non-UTF-8 file {}", file.path.display());
        return Ok(None);
    };

    let old_size = text.len() as u64;
    let rel = file.path.strip_prefix(root).unwrap_or(&file.path).to_path_buf();
    let new_size = match engine.rewrite(text) {
        Some(rewritten) => {
            let new_size = rewritten.len() as u64;
            write_atomic(&file.path, rewritten.as_bytes())?;
            new_size
        }
        // Nothing matched; the content on disk is already the output.
        None => old_size,
    };
    Ok(Some(FileSavings { path: rel, old_size, new_size }))
}

enum SourceText {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl SourceText {
    fn as_str(&self) -> Option<&str> {
        let bytes = match self {
            SourceText::Owned(b) => b.as_slice(),
            SourceText::Mapped(m) => &m[..],
        };
        std::str::from_utf8(bytes).ok()
    }
}

/// Direct read below [`MMAP_THRESHOLD`], memory-map above.
#[allow(unsafe_code)]
fn read_source(path: &Path) -> io::Result<SourceText> {
    let meta = fs::metadata(path)?;
    if meta.len() < MMAP_THRESHOLD {
        return Ok(SourceText::Owned(fs::read(path)?));
    }
    let file = File::open(path)?;
    // SAFETY: the handle was just opened and the mapping is never
    // written through. The rewrite replaces the path via rename, which
    // leaves the mapped inode intact until the map is dropped.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(SourceText::Mapped(mmap))
}

/// Replace `path` by writing a sibling temp file and renaming it over,
/// so a concurrent reader never observes a half-written file.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".reclass-tmp");
    let tmp = path.with_file_name(name);

    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
