// ---------------------------------------------------------------------------
// File discovery and the numbered index
// ---------------------------------------------------------------------------

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::types::{IndexEntry, ScanConfig};

// ---------------------------------------------------------------------------
// Binary file detection
// ---------------------------------------------------------------------------

/// Probe the first 2 KiB: a NUL byte or a mostly non-printable payload
/// marks the file as binary. Unreadable files count as binary.
pub fn is_binary(path: &Path) -> bool {
    let mut file = match fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return true,
    };
    let mut buf = [0u8; 2048];
    let n = match std::io::Read::read(&mut file, &mut buf) {
        Ok(n) => n,
        Err(_) => return true,
    };
    if n == 0 {
        return false;
    }
    let chunk = &buf[..n];
    if chunk.contains(&0) {
        return true;
    }
    let textish =
        chunk.iter().filter(|&&c| matches!(c, b'\t' | b'\r' | b'\n' | 0x0c | 0x08) || (32..=126).contains(&c)).count();
    (textish as f64 / n as f64) < 0.5
}

// ---------------------------------------------------------------------------
// Line/byte stats
// ---------------------------------------------------------------------------

/// Count lines and bytes the way the report presents them: trailing
/// newline does not add a line; a non-empty file without one still counts
/// its last line.
pub fn count_lines_bytes(text: &str) -> (usize, u64) {
    let newlines = text.matches('\n').count();
    let lines = if text.is_empty() {
        0
    } else if text.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    };
    (lines, text.len() as u64)
}

/// Read a file as text, replacing invalid UTF-8 rather than failing.
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Walk + filter + number
// ---------------------------------------------------------------------------

/// Walk the configured directory and build the numbered file index.
///
/// Filters, in order: hidden paths, exclude globs (applied during the
/// walk), extension filter, max-size limit, binary probe, and — when a
/// tracked set is supplied — git-tracked membership. Entries are sorted by
/// lowercased relative path and numbered from 1, so the numbering is
/// stable across runs over the same tree.
pub fn index_files(config: &ScanConfig, tracked: Option<&HashSet<String>>) -> Vec<IndexEntry> {
    let raw = walk_files(config);
    debug!(candidates = raw.len(), "Walk complete");

    let mut kept: Vec<(PathBuf, String)> = raw
        .into_par_iter()
        .filter(|(abs, rel)| {
            if !config.extensions.is_empty() {
                let ext = abs.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
                if !config.extensions.contains(&ext) {
                    return false;
                }
            }
            if let Some(max_kb) = config.max_size_kb {
                if let Ok(meta) = fs::metadata(abs) {
                    if meta.len() > max_kb * 1024 {
                        return false;
                    }
                }
            }
            if is_binary(abs) {
                return false;
            }
            if let Some(set) = tracked {
                if !set.contains(rel.as_str()) {
                    return false;
                }
            }
            true
        })
        .collect();

    kept.sort_by_key(|(_, rel)| rel.to_lowercase());

    kept.into_par_iter()
        .map(|(abs, rel)| {
            let (lines, bytes) = match read_text(&abs) {
                Ok(text) => count_lines_bytes(&text),
                Err(_) => (0, fs::metadata(&abs).map(|m| m.len()).unwrap_or(0)),
            };
            (rel, lines, bytes)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .enumerate()
        .map(|(i, (path, lines, bytes))| IndexEntry { num: i + 1, path, lines, bytes })
        .collect()
}

/// Parallel directory walk honoring hidden-file skipping and exclude globs.
fn walk_files(config: &ScanConfig) -> Vec<(PathBuf, String)> {
    let root = &config.lib_dir;
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(config.skip_hidden)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .threads(rayon::current_num_threads().min(12));

    if !config.exclude_globs.is_empty() {
        let mut ov = OverrideBuilder::new(root);
        for glob in &config.exclude_globs {
            if let Err(e) = ov.add(&format!("!{glob}")) {
                warn!(glob = glob.as_str(), error = %e, "Ignoring invalid exclude glob");
            }
        }
        match ov.build() {
            Ok(overrides) => {
                builder.overrides(overrides);
            }
            Err(e) => warn!(error = %e, "Could not build exclude globs"),
        }
    }

    let results: Mutex<Vec<(PathBuf, String)>> = Mutex::new(Vec::new());
    builder.build_parallel().run(|| {
        Box::new(|entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => return ignore::WalkState::Continue,
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return ignore::WalkState::Continue;
            }
            let abs = entry.path().to_path_buf();
            let rel = abs
                .strip_prefix(&config.lib_dir)
                .unwrap_or(&abs)
                .to_string_lossy()
                .replace('\\', "/");
            results.lock().unwrap().push((abs, rel));
            ignore::WalkState::Continue
        })
    });

    results.into_inner().unwrap()
}

// ---------------------------------------------------------------------------
// Selection ranges
// ---------------------------------------------------------------------------

/// Parse a selection expression like `"1,4-7,12"` against `max_n` entries.
/// Reversed ranges are swapped, out-of-range numbers clamped or dropped,
/// and unparseable parts ignored. Result is sorted and deduplicated.
pub fn parse_select_ranges(sel: &str, max_n: usize) -> Vec<usize> {
    let mut selected: HashSet<usize> = HashSet::new();
    for part in sel.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((a, b)) = part.split_once('-') {
            let (start, end) = match (a.trim().parse::<usize>(), b.trim().parse::<usize>()) {
                (Ok(s), Ok(e)) => (s, e),
                _ => continue,
            };
            let (start, end) = if start > end { (end, start) } else { (start, end) };
            for x in start.max(1)..=end.min(max_n) {
                selected.insert(x);
            }
        } else if let Ok(x) = part.parse::<usize>() {
            if (1..=max_n).contains(&x) {
                selected.insert(x);
            }
        }
    }
    let mut out: Vec<usize> = selected.into_iter().collect();
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_ranges_basic() {
        assert_eq!(parse_select_ranges("1,4-7,12", 20), vec![1, 4, 5, 6, 7, 12]);
    }

    #[test]
    fn select_ranges_reversed_and_clamped() {
        assert_eq!(parse_select_ranges("7-4, 30", 10), vec![4, 5, 6, 7]);
        assert_eq!(parse_select_ranges("0-3", 10), vec![1, 2, 3]);
    }

    #[test]
    fn select_ranges_garbage_ignored() {
        assert_eq!(parse_select_ranges("x, ,2,-,3-x", 10), vec![2]);
    }

    #[test]
    fn line_counts_match_report_semantics() {
        assert_eq!(count_lines_bytes(""), (0, 0));
        assert_eq!(count_lines_bytes("a\nb\n"), (2, 4));
        assert_eq!(count_lines_bytes("a\nb"), (2, 3));
    }
}
