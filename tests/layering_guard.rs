//! Layering guardrails for the vocabulary crate.
//!
//! `retrial_core` holds only closed vocabularies and must stay dependency-free, and the engine must take it as a
//! regular dependency (not only as a dev-dependency). These tests scan the manifests directly.

/// Non-comment lines inside the `[table]` section of a manifest.
fn table_entries<'a>(manifest: &'a str, table: &str) -> Vec<&'a str> {
    let header = format!("[{table}]");
    let mut inside = false;
    let mut entries = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the table.
        if line.starts_with('[') {
            inside = line == header;
            continue;
        }
        if !inside || line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if !line_no_comment.is_empty() {
            entries.push(line_no_comment);
        }
    }
    entries
}

#[test]
fn vocabulary_crate_has_no_dependencies() {
    let manifest = include_str!("../crates/retrial_core/Cargo.toml");
    let deps = table_entries(manifest, "dependencies");
    assert!(deps.is_empty(), "`retrial_core` must not declare dependencies, found {deps:?}");
}

#[test]
fn engine_depends_on_vocabulary_crate() {
    let manifest = include_str!("../Cargo.toml");
    let deps = table_entries(manifest, "dependencies");
    assert!(
        deps.iter().any(|line| line.starts_with("retrial_core")),
        "`retrial_core` must appear in [dependencies]"
    );
}
