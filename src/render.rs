// ---------------------------------------------------------------------------
// Text rendering: tree, index, outline report, content export
// ---------------------------------------------------------------------------

use std::fs;
use std::path::Path;

use crate::outline::FileOutline;
use crate::scan::read_text;
use crate::types::{IndexEntry, ScanConfig, Symbol, TOP_LEVEL_GROUP_ORDER};

fn separator() -> String {
    "=".repeat(80)
}

fn subsep() -> String {
    "-".repeat(80)
}

/// One selected file's outline outcome, ready for rendering. The error
/// branch carries the read failure message verbatim.
pub struct FileReport {
    pub num: usize,
    pub path: String,
    pub outcome: Result<FileOutline, String>,
}

// ---------------------------------------------------------------------------
// Directory tree
// ---------------------------------------------------------------------------

/// Render a box-drawing tree of `root`. Directories sort before files,
/// both case-insensitively. A missing root renders as a one-line stub so
/// the report section stays present.
pub fn render_tree(root: &Path, skip_hidden: bool) -> String {
    let name = root.file_name().map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().into_owned());
    if !root.is_dir() {
        return format!("{name}/ (not found)\n");
    }
    let mut lines = vec![format!("{name}/")];
    walk_tree(root, "", skip_hidden, &mut lines);
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn walk_tree(dir: &Path, prefix: &str, skip_hidden: bool, lines: &mut Vec<String>) {
    let mut entries: Vec<(bool, String, std::path::PathBuf)> = match fs::read_dir(dir) {
        Ok(rd) => rd
            .flatten()
            .map(|e| {
                let path = e.path();
                let name = e.file_name().to_string_lossy().into_owned();
                (path.is_file(), name, path)
            })
            .collect(),
        Err(_) => return,
    };
    if skip_hidden {
        entries.retain(|(_, name, _)| !name.starts_with('.'));
    }
    entries.sort_by(|a, b| (a.0, a.1.to_lowercase()).cmp(&(b.0, b.1.to_lowercase())));

    let last = entries.len().saturating_sub(1);
    for (i, (is_file, name, path)) in entries.iter().enumerate() {
        let connector = if i == last { "└── " } else { "├── " };
        if *is_file {
            lines.push(format!("{prefix}{connector}{name}"));
        } else {
            lines.push(format!("{prefix}{connector}{name}/"));
            let child_prefix = if i == last { format!("{prefix}    ") } else { format!("{prefix}│   ") };
            walk_tree(path, &child_prefix, skip_hidden, lines);
        }
    }
}

// ---------------------------------------------------------------------------
// Index listing
// ---------------------------------------------------------------------------

fn index_row(entry: &IndexEntry, mark: &str) -> String {
    format!("{:>4}. {}  ({} lines, {} bytes){}\n", entry.num, entry.path, entry.lines, entry.bytes, mark)
}

/// Plain numbered listing for `--list-only`, written to stdout.
pub fn render_index_listing(entries: &[IndexEntry]) -> String {
    let mut out = String::new();
    out.push_str(&separator());
    out.push_str("\nFILE INDEX (numbered)\n");
    out.push_str(&separator());
    out.push('\n');
    for entry in entries {
        out.push_str(&index_row(entry, ""));
    }
    out.push_str(&format!("\nTotal indexed: {}\n", entries.len()));
    out
}

// ---------------------------------------------------------------------------
// Outline report
// ---------------------------------------------------------------------------

fn fmt_symbol(s: &Symbol) -> String {
    if s.extra.is_empty() {
        format!("  L{:>4}: {}", s.line, s.name)
    } else {
        format!("  L{:>4}: {} — {}", s.line, s.name, s.extra)
    }
}

/// Assemble the full outline report: both directory trees, the marked
/// file index, then one outline section per selected file.
pub fn render_report(
    config: &ScanConfig,
    entries: &[IndexEntry],
    selected_nums: &[usize],
    files: &[FileReport],
) -> String {
    let sep = separator();
    let sub = subsep();
    let mut out = String::new();

    out.push_str(&format!("{sep}\nPROJECT TREE\n{sep}\n\n"));
    out.push_str(&format!("{sub}\nFolder structure: {}\n{sub}\n", config.assets_dir.display()));
    out.push_str(&render_tree(&config.assets_dir, config.skip_hidden));
    out.push('\n');
    out.push_str(&format!("{sub}\nFolder structure: {}\n{sub}\n", config.lib_dir.display()));
    out.push_str(&render_tree(&config.lib_dir, config.skip_hidden));
    out.push('\n');

    out.push_str(&format!("{sep}\nFILE INDEX (numbered)\n{sep}\n"));
    for entry in entries {
        let mark = if selected_nums.contains(&entry.num) { " *" } else { "" };
        out.push_str(&index_row(entry, mark));
    }
    out.push_str(&format!("\nTotal indexed: {}\n", entries.len()));
    out.push_str(&format!("Marked '*' = current selection ({} files)\n\n", selected_nums.len()));

    out.push_str(&format!("{sep}\nOUTLINE OF SELECTED FILES ({})\n{sep}\n\n", selected_nums.len()));
    for file in files {
        out.push_str(&format!("{sub}\nFILE #{}: {}\n{sub}\n", file.num, file.path));
        match &file.outcome {
            Err(e) => out.push_str(&format!("[READ ERROR: {e}]\n\n")),
            Ok(outline) => {
                render_outline_section(outline, &mut out);
                out.push('\n');
            }
        }
    }

    out
}

fn render_outline_section(outline: &FileOutline, out: &mut String) {
    let classes: Vec<&Symbol> = outline.classes().collect();
    if !classes.is_empty() {
        out.push_str("[CLASS]\n");
        for class in &classes {
            out.push_str(&fmt_symbol(class));
            out.push('\n');
            if let Some(members) = outline.members_by_class.get(&class.name) {
                if !members.is_empty() {
                    out.push_str(&format!("[METHODS {}]\n", class.name));
                    for m in members {
                        out.push_str(&fmt_symbol(m));
                        out.push('\n');
                    }
                }
            }
        }
    }

    for kind in TOP_LEVEL_GROUP_ORDER {
        let group: Vec<&Symbol> = outline.top_level.iter().filter(|s| s.kind == *kind).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("[{}]\n", kind.label()));
        for s in &group {
            out.push_str(&fmt_symbol(s));
            out.push('\n');
        }
    }

    if !outline.orphans.is_empty() {
        out.push_str("[METHODS (orphans)]\n");
        for m in &outline.orphans {
            let owner = m.owner.as_deref().unwrap_or("?");
            out.push_str(&format!("  {owner} ::{}\n", fmt_symbol(m)));
        }
    }
}

// ---------------------------------------------------------------------------
// Content export
// ---------------------------------------------------------------------------

/// Concatenate the full text of the selected files, each behind a numbered
/// header, optionally wrapped in Markdown code fences.
pub fn render_content_export(
    lib_dir: &Path,
    entries: &[IndexEntry],
    selected_nums: &[usize],
    use_fences: bool,
) -> String {
    let sep = separator();
    let sub = subsep();
    let mut out = String::new();
    out.push_str(&format!("{sep}\nCONTENT EXPORT ({} files)\n{sep}\n\n", selected_nums.len()));

    for num in selected_nums {
        let Some(entry) = entries.iter().find(|e| e.num == *num) else {
            continue;
        };
        out.push_str(&format!("{sub}\nFILE #{}: {}\n{sub}\n", entry.num, entry.path));
        let text = match read_text(&lib_dir.join(&entry.path)) {
            Ok(t) => t,
            Err(e) => {
                out.push_str(&format!("[READ ERROR: {e}]\n\n"));
                continue;
            }
        };
        if use_fences {
            out.push_str("```dart\n");
            out.push_str(&text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n\n");
        } else {
            out.push_str(&text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::outline_text;
    use crate::types::SymbolKind;
    use std::collections::BTreeMap;

    fn entry(num: usize, path: &str) -> IndexEntry {
        IndexEntry { num, path: path.to_string(), lines: 10, bytes: 100 }
    }

    #[test]
    fn tree_renders_missing_root_as_stub() {
        let rendered = render_tree(Path::new("/definitely/not/here/assets"), true);
        assert_eq!(rendered, "assets/ (not found)\n");
    }

    #[test]
    fn tree_orders_dirs_before_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.dart"), "x").unwrap();
        fs::write(dir.path().join("main.dart"), "x").unwrap();
        fs::write(dir.path().join(".hidden"), "x").unwrap();

        let rendered = render_tree(dir.path(), true);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[1].contains("src/"), "dirs first: {rendered}");
        assert!(lines[2].contains("a.dart"));
        assert!(lines[3].contains("main.dart"));
        assert!(!rendered.contains(".hidden"));
    }

    #[test]
    fn index_listing_footer_counts_entries() {
        let listing = render_index_listing(&[entry(1, "a.dart"), entry(2, "b.dart")]);
        assert!(listing.contains("   1. a.dart  (10 lines, 100 bytes)"));
        assert!(listing.contains("Total indexed: 2"));
    }

    #[test]
    fn report_marks_selected_entries() {
        let config = ScanConfig::new("/nope/lib".into(), "/nope/assets".into());
        let src = "class Foo {\n  Foo();\n}\n";
        let files = vec![FileReport {
            num: 2,
            path: "foo.dart".into(),
            outcome: Ok(outline_text(src, true)),
        }];
        let report =
            render_report(&config, &[entry(1, "a.dart"), entry(2, "foo.dart")], &[2], &files);

        assert!(report.contains("   2. foo.dart  (10 lines, 100 bytes) *"));
        assert!(!report.contains("a.dart  (10 lines, 100 bytes) *"));
        assert!(report.contains("FILE #2: foo.dart"));
        assert!(report.contains("[CLASS]\n  L   1: Foo\n[METHODS Foo]\n  L   2: Foo — (…)"));
    }

    #[test]
    fn report_groups_follow_fixed_order() {
        let src = "final xProvider = Provider<int>((ref) => 1);\nenum E { a }\nmixin M {}\n";
        let files =
            vec![FileReport { num: 1, path: "m.dart".into(), outcome: Ok(outline_text(src, true)) }];
        let config = ScanConfig::new("/nope/lib".into(), "/nope/assets".into());
        let report = render_report(&config, &[entry(1, "m.dart")], &[1], &files);

        let mixin_at = report.find("[MIXIN]").unwrap();
        let enum_at = report.find("[ENUM]").unwrap();
        let provider_at = report.find("[PROVIDER]").unwrap();
        assert!(mixin_at < enum_at && enum_at < provider_at);
    }

    #[test]
    fn report_surfaces_read_errors_inline() {
        let config = ScanConfig::new("/nope/lib".into(), "/nope/assets".into());
        let files = vec![FileReport {
            num: 1,
            path: "gone.dart".into(),
            outcome: Err("No such file or directory".into()),
        }];
        let report = render_report(&config, &[entry(1, "gone.dart")], &[1], &files);
        assert!(report.contains("[READ ERROR: No such file or directory]"));
    }

    #[test]
    fn orphan_members_render_with_owner_prefix() {
        let outline = FileOutline {
            top_level: Vec::new(),
            members_by_class: BTreeMap::new(),
            orphans: vec![Symbol {
                kind: SymbolKind::Method,
                owner: Some("Local".into()),
                name: "go".into(),
                extra: "()".into(),
                line: 3,
            }],
        };
        let mut out = String::new();
        render_outline_section(&outline, &mut out);
        assert!(out.contains("[METHODS (orphans)]\n  Local ::  L   3: go — ()"));
    }

    #[test]
    fn content_export_wraps_in_fences_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.dart"), "void main() {}").unwrap();
        let entries = [entry(1, "a.dart")];

        let plain = render_content_export(dir.path(), &entries, &[1], false);
        assert!(plain.contains("FILE #1: a.dart"));
        assert!(plain.contains("void main() {}\n"));
        assert!(!plain.contains("```"));

        let fenced = render_content_export(dir.path(), &entries, &[1], true);
        assert!(fenced.contains("```dart\nvoid main() {}\n```"));
    }
}
