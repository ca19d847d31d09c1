// ---------------------------------------------------------------------------
// Machine-readable index sidecar (<output>.index.json)
// ---------------------------------------------------------------------------

use std::path::Path;

use serde::Serialize;

use crate::types::IndexEntry;

/// JSON companion to the text report: maps index numbers back to paths so
/// downstream tools can resolve a selection without re-walking the tree.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub root: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_output: Option<String>,
    pub total_indexed: usize,
    pub selected_count: usize,
    pub selected_nums: Vec<usize>,
    pub files: Vec<IndexReportRow>,
}

#[derive(Debug, Serialize)]
pub struct IndexReportRow {
    pub num: usize,
    pub path: String,
    pub lines: usize,
    pub bytes: u64,
    pub selected: bool,
}

impl IndexReport {
    pub fn build(
        root: &Path,
        output: &Path,
        content_output: Option<&Path>,
        entries: &[IndexEntry],
        selected_nums: &[usize],
    ) -> Self {
        let files = entries
            .iter()
            .map(|e| IndexReportRow {
                num: e.num,
                path: e.path.clone(),
                lines: e.lines,
                bytes: e.bytes,
                selected: selected_nums.contains(&e.num),
            })
            .collect();
        Self {
            root: root.display().to_string(),
            output: output.display().to_string(),
            content_output: content_output.map(|p| p.display().to_string()),
            total_indexed: entries.len(),
            selected_count: selected_nums.len(),
            selected_nums: selected_nums.to_vec(),
            files,
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Sidecar path for a given report output: the report's file name with
/// `.index.json` appended (`lib_outline.txt` -> `lib_outline.txt.index.json`).
pub fn sidecar_path(output: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = output.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    name.push_str(suffix);
    output.with_file_name(name)
}
