//! Behavioral specifications for the full build lifecycle.
//!
//! These tests drive the pipeline the way a build orchestrator would:
//! reset, record fragments while "compilation" runs, then finalize
//! against a real output tree on disk and verify both the rewritten
//! files and the cleanup guarantees.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use reclass::{
    ConsoleReporter, Error, FinalizeOutcome, RenameConfig, RenameMap, RenamePipeline,
};

fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
}

fn fragment(pairs: &[(&str, &str)]) -> RenameMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn pipeline(tmp: &TempDir) -> RenamePipeline {
    let config = RenameConfig {
        store_dir: tmp.path().join("class-maps"),
        ..RenameConfig::default()
    };
    RenamePipeline::new(config).unwrap()
}

#[test]
fn rewrites_a_multi_page_site() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    write_tree(
        &dist,
        &[
            ("index.html", r#"<div class="hero"><a class="btn btn-large">Go</a></div>"#),
            ("blog/index.html", r#"<article class="card"><h2 class="card-title">"#),
            ("assets/app.js", r#"document.querySelector(".btn").classList.add("card");"#),
            ("assets/style.css", ".btn { color: red } .card {}"),
        ],
    );

    let p = pipeline(&tmp);
    p.begin();
    // One fragment per CSS-bearing compilation unit.
    p.record_fragment(&fragment(&[("hero", "a"), ("btn", "b")]));
    p.record_fragment(&fragment(&[("card", "c"), ("card-title", "d")]));

    let FinalizeOutcome::Rewritten(report) = p.finalize(&dist) else {
        panic!("expected a rewritten outcome");
    };

    assert_eq!(
        fs::read_to_string(dist.join("index.html")).unwrap(),
        r#"<div class="a"><a class="b btn-large">Go</a></div>"#
    );
    assert_eq!(
        fs::read_to_string(dist.join("blog/index.html")).unwrap(),
        r#"<article class="c"><h2 class="d">"#
    );
    assert_eq!(
        fs::read_to_string(dist.join("assets/app.js")).unwrap(),
        r#"document.querySelector(".b").classList.add("c");"#
    );
    // Stylesheets are the shortener's concern, not ours.
    assert_eq!(
        fs::read_to_string(dist.join("assets/style.css")).unwrap(),
        ".btn { color: red } .card {}"
    );

    assert_eq!(report.files().len(), 3);
    let expected_saved: i64 = report.files().iter().map(|f| f.saved()).sum();
    assert_eq!(report.total_saved(), expected_saved);
    assert!(report.total_saved() > 0);

    // Fragments are transient build state.
    assert!(!p.store().root().exists());
}

#[test]
fn later_fragments_override_earlier_ones() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    write_tree(&dist, &[("index.html", r#"<div class="btn">"#)]);

    let p = pipeline(&tmp);
    p.begin();
    // Two units renamed the same class; the store keeps both fragments
    // and the merge resolves the collision deterministically.
    fs::create_dir_all(p.store().root()).unwrap();
    fs::write(p.store().root().join("class-map-0001.json"), r#"{"btn":"x"}"#).unwrap();
    fs::write(p.store().root().join("class-map-0002.json"), r#"{"btn":"y"}"#).unwrap();

    assert!(matches!(p.finalize(&dist), FinalizeOutcome::Rewritten(_)));
    assert_eq!(
        fs::read_to_string(dist.join("index.html")).unwrap(),
        r#"<div class="y">"#
    );
}

#[test]
fn a_second_finalize_finds_nothing_to_do() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    write_tree(&dist, &[("index.html", r#"<div class="btn">"#)]);

    let p = pipeline(&tmp);
    p.begin();
    p.record_fragment(&fragment(&[("btn", "a")]));

    assert!(matches!(p.finalize(&dist), FinalizeOutcome::Rewritten(_)));
    // The first pass consumed the store.
    assert!(matches!(p.finalize(&dist), FinalizeOutcome::NothingToDo));
    // And the already-rewritten output was not touched again.
    assert_eq!(
        fs::read_to_string(dist.join("index.html")).unwrap(),
        r#"<div class="a">"#
    );
}

#[test]
fn missing_output_root_reports_failure_and_cleans_up() {
    let tmp = TempDir::new().unwrap();

    let p = pipeline(&tmp);
    p.begin();
    p.record_fragment(&fragment(&[("btn", "a")]));

    let outcome = p.finalize(&tmp.path().join("never-built"));
    assert!(matches!(
        outcome,
        FinalizeOutcome::Failed(Error::OutputUnavailable { .. })
    ));
    assert!(!p.store().root().exists());
}

#[test]
fn console_reporter_survives_a_full_pass() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    write_tree(&dist, &[("index.html", r#"<div class="btn btn-large">"#)]);

    let mut p = pipeline(&tmp);
    p.add_observer(Box::new(ConsoleReporter::default()));
    p.begin();
    p.record_fragment(&fragment(&[("btn", "a"), ("btn-large", "b")]));

    assert!(matches!(p.finalize(&dist), FinalizeOutcome::Rewritten(_)));
    assert_eq!(
        fs::read_to_string(dist.join("index.html")).unwrap(),
        r#"<div class="a b">"#
    );
}
