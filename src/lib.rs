//! Dartscope — structural outliner for Dart/Flutter source trees.
//!
//! This crate indexes a Flutter project's `lib/` directory, extracts a
//! structural outline of every Dart file (classes and their members,
//! top-level functions, enums, mixins, Riverpod providers, GoRouter
//! routes), and renders a single navigable text report plus a
//! machine-readable JSON index.
//!
//! # Modules
//!
//! - [`lexer`] — Line classifier: strings/comments stripped, braces counted
//! - [`blocks`] — Class block locator over classified lines
//! - [`signatures`] — Member signature aggregation and classification
//! - [`toplevel`] — Top-level symbol scanning at global depth 0
//! - [`outline`] — Per-file outline assembly (top level + members + orphans)
//! - [`scan`] — File discovery, filtering, and the numbered index
//! - [`git`] — Tracked-file lookup for `--git-only`
//! - [`render`] — Text report, directory trees, content export
//! - [`report`] — JSON index sidecar
//! - [`types`] — Core types shared across the crate

pub mod blocks;
pub mod git;
pub mod lexer;
pub mod outline;
pub mod render;
pub mod report;
pub mod scan;
pub mod signatures;
pub mod toplevel;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

use types::ScanConfig;

// ---------------------------------------------------------------------------
// .dartscope.toml config loading
// ---------------------------------------------------------------------------

/// Known keys in `.dartscope.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["lib_dir", "assets_dir", "extensions", "exclude_globs", "max_size_kb"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Extension normalized for filtering: lowercased, no leading dot.
pub fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Merge `.dartscope.toml` from the given directory into `config`.
///
/// A missing file is fine; a malformed one logs a warning and changes
/// nothing. Unknown keys trigger a warning with a typo suggestion. CLI
/// flags are applied after this, so they always win.
pub fn apply_dartscope_config(dir: &Path, config: &mut ScanConfig) {
    let config_path = dir.join(".dartscope.toml");
    if !config_path.exists() {
        return;
    }
    debug!("Loading .dartscope.toml");
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Could not read .dartscope.toml");
            return;
        }
    };
    let table = match content.parse::<toml::Table>() {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "Failed to parse .dartscope.toml");
            return;
        }
    };

    // Validate keys — warn on unknown
    for key in table.keys() {
        if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            let suggestion =
                KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k)).unwrap();
            let dist = edit_distance(key, suggestion);
            if dist <= 3 {
                warn!(
                    key = key.as_str(),
                    suggestion = *suggestion,
                    "Unknown key in .dartscope.toml — did you mean '{suggestion}'?"
                );
            } else {
                warn!(
                    key = key.as_str(),
                    "Unknown key in .dartscope.toml (known keys: {})",
                    KNOWN_CONFIG_KEYS.join(", ")
                );
            }
        }
    }

    if let Some(dir) = table.get("lib_dir").and_then(|v| v.as_str()) {
        config.lib_dir = dir.into();
    }
    if let Some(dir) = table.get("assets_dir").and_then(|v| v.as_str()) {
        config.assets_dir = dir.into();
    }
    if let Some(exts) = table.get("extensions").and_then(|v| v.as_array()) {
        config.extensions =
            exts.iter().filter_map(|v| v.as_str()).map(normalize_ext).collect();
    }
    // exclude_globs — merge, not replace
    if let Some(globs) = table.get("exclude_globs").and_then(|v| v.as_array()) {
        for g in globs {
            if let Some(s) = g.as_str() {
                config.exclude_globs.push(s.to_string());
            }
        }
    }
    if let Some(kb) = table.get("max_size_kb").and_then(|v| v.as_integer()) {
        if kb > 0 {
            config.max_size_kb = Some(kb as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("extensions", "extensions"), 0);
        assert_eq!(edit_distance("extentions", "extensions"), 1);
        assert_eq!(edit_distance("abc", "xyz"), 3);
    }

    #[test]
    fn ext_normalization() {
        assert_eq!(normalize_ext(".Dart"), "dart");
        assert_eq!(normalize_ext("md"), "md");
    }

    #[test]
    fn config_file_merges_into_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".dartscope.toml"),
            "extensions = [\".dart\", \"md\"]\nexclude_globs = [\"**/*.g.dart\"]\nmax_size_kb = 256\n",
        )
        .unwrap();

        let mut config = ScanConfig::new("lib".into(), "assets".into());
        config.exclude_globs.push("build/**".to_string());
        apply_dartscope_config(dir.path(), &mut config);

        assert!(config.extensions.contains("dart"));
        assert!(config.extensions.contains("md"));
        assert_eq!(config.exclude_globs, vec!["build/**", "**/*.g.dart"]);
        assert_eq!(config.max_size_kb, Some(256));
    }

    #[test]
    fn missing_config_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ScanConfig::new("lib".into(), "assets".into());
        apply_dartscope_config(dir.path(), &mut config);
        assert!(config.extensions.is_empty());
        assert_eq!(config.max_size_kb, None);
    }
}
