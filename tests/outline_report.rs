//! End-to-end tests over the `basic` fixture project: indexing, outline
//! extraction, report rendering, and the JSON sidecar.

mod helpers;

use helpers::TestProject;

use dartscope::render::{render_content_export, render_report, FileReport};
use dartscope::report::IndexReport;
use dartscope::{git, outline, scan};

fn outline_reports(p: &TestProject, selected: &[usize]) -> Vec<FileReport> {
    let entries = scan::index_files(&p.config, None);
    selected
        .iter()
        .map(|num| {
            let entry = entries.iter().find(|e| e.num == *num).expect("selected entry");
            let text = scan::read_text(&p.config.lib_dir.join(&entry.path)).expect("read fixture");
            FileReport {
                num: *num,
                path: entry.path.clone(),
                outcome: Ok(outline::outline_text(&text, true)),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[test]
fn index_is_sorted_and_numbered() {
    let p = TestProject::from_fixture("basic");
    let entries = scan::index_files(&p.config, None);
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["gen/user.g.dart", "main.dart", "models/user.dart", "notes.md", "providers.dart"]
    );
    let nums: Vec<usize> = entries.iter().map(|e| e.num).collect();
    assert_eq!(nums, vec![1, 2, 3, 4, 5]);
    assert!(entries.iter().all(|e| e.lines > 0 && e.bytes > 0));
}

#[test]
fn extension_filter_drops_markdown() {
    let mut p = TestProject::from_fixture("basic");
    p.config.extensions.insert("dart".to_string());
    let entries = scan::index_files(&p.config, None);
    assert!(entries.iter().all(|e| e.path.ends_with(".dart")));
    assert_eq!(entries.len(), 4);
}

#[test]
fn exclude_glob_drops_generated_files() {
    let mut p = TestProject::from_fixture("basic");
    p.config.exclude_globs.push("**/*.g.dart".to_string());
    let entries = scan::index_files(&p.config, None);
    assert!(entries.iter().all(|e| !e.path.ends_with(".g.dart")));
    assert_eq!(entries.len(), 4);
}

#[test]
fn binary_files_are_excluded() {
    let p = TestProject::from_fixture("basic");
    std::fs::write(p.config.lib_dir.join("blob.bin"), [0u8, 159, 146, 150, 0]).unwrap();
    let entries = scan::index_files(&p.config, None);
    assert!(entries.iter().all(|e| e.path != "blob.bin"));
}

#[test]
fn max_size_filter_drops_large_files() {
    let mut p = TestProject::from_fixture("basic");
    std::fs::write(p.config.lib_dir.join("big.dart"), "// x\n".repeat(2000)).unwrap();
    p.config.max_size_kb = Some(1);
    let entries = scan::index_files(&p.config, None);
    assert!(entries.iter().all(|e| e.path != "big.dart"));
}

#[test]
fn git_only_keeps_tracked_files() {
    let p = TestProject::from_fixture("basic");
    let repo = git2::Repository::init(p.root()).expect("git init");
    {
        let mut index = repo.index().expect("open index");
        index.add_path(std::path::Path::new("lib/main.dart")).expect("add path");
        index.write().expect("write index");
    }

    let tracked = git::tracked_files(&p.config.lib_dir);
    assert_eq!(tracked.len(), 1);
    assert!(tracked.contains("main.dart"));

    let entries = scan::index_files(&p.config, Some(&tracked));
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["main.dart"]);
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[test]
fn report_covers_trees_index_and_outlines() {
    let p = TestProject::from_fixture("basic");
    let entries = scan::index_files(&p.config, None);
    let selected: Vec<usize> = entries.iter().map(|e| e.num).collect();
    let files = outline_reports(&p, &selected);
    let report = render_report(&p.config, &entries, &selected, &files);

    // Trees
    assert!(report.contains("PROJECT TREE"));
    assert!(report.contains("assets/"));
    assert!(report.contains("└── ") || report.contains("├── "));
    assert!(report.contains("logo.txt"));

    // Index section with every entry marked
    assert!(report.contains("FILE INDEX (numbered)"));
    assert!(report.contains("main.dart") && report.contains(" *"));
    assert!(report.contains("Total indexed: 5"));

    // Outline content
    assert!(report.contains("[CLASS]"));
    assert!(report.contains("[METHODS User]"));
    assert!(report.contains("User.anonymous — (…)"));
    assert!(report.contains("isAnonymous"));
    assert!(report.contains("operator =="));
    assert!(report.contains("toJson — ()"));
    assert!(report.contains("[ENUM]"));
    assert!(report.contains("Role"));
    assert!(report.contains("[FUNCTION]"));
    assert!(report.contains("main — ()"));
    assert!(report.contains("[PROVIDER]"));
    assert!(report.contains("counterProvider"));
    assert!(report.contains("[ROUTE]"));
    assert!(report.contains("home — /"));
    assert!(report.contains("settings — /settings"));
}

#[test]
fn selection_limits_outline_sections() {
    let p = TestProject::from_fixture("basic");
    let entries = scan::index_files(&p.config, None);
    let selected = scan::parse_select_ranges("3", entries.len());
    let files = outline_reports(&p, &selected);
    let report = render_report(&p.config, &entries, &selected, &files);

    assert!(report.contains("OUTLINE OF SELECTED FILES (1)"));
    assert!(report.contains("FILE #3: models/user.dart"));
    assert!(!report.contains("FILE #2: main.dart"));
    // Unselected entries still listed in the index, unmarked
    let main_row = report
        .lines()
        .find(|l| l.trim_start().starts_with("2. main.dart"))
        .expect("main.dart index row");
    assert!(!main_row.ends_with('*'), "unexpected selection mark: {main_row}");
}

#[test]
fn markdown_file_outlines_empty() {
    let p = TestProject::from_fixture("basic");
    let text = scan::read_text(&p.config.lib_dir.join("notes.md")).unwrap();
    let outline = outline::outline_text(&text, true);
    assert!(outline.is_empty());
}

// ---------------------------------------------------------------------------
// Sidecars
// ---------------------------------------------------------------------------

#[test]
fn index_json_round_trips_through_serde() {
    let p = TestProject::from_fixture("basic");
    let entries = scan::index_files(&p.config, None);
    let report = IndexReport::build(
        &p.config.lib_dir,
        std::path::Path::new("lib_outline.txt"),
        None,
        &entries,
        &[2, 3],
    );
    let json = report.to_pretty_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["total_indexed"], 5);
    assert_eq!(value["selected_count"], 2);
    assert_eq!(value["selected_nums"], serde_json::json!([2, 3]));
    let files = value["files"].as_array().unwrap();
    assert_eq!(files.len(), 5);
    assert_eq!(files[1]["path"], "main.dart");
    assert_eq!(files[1]["selected"], true);
    assert_eq!(files[0]["selected"], false);
}

#[test]
fn content_export_embeds_selected_sources() {
    let p = TestProject::from_fixture("basic");
    let entries = scan::index_files(&p.config, None);

    let export = render_content_export(&p.config.lib_dir, &entries, &[2], true);
    assert!(export.contains("CONTENT EXPORT (1 files)"));
    assert!(export.contains("FILE #2: main.dart"));
    assert!(export.contains("```dart\n"));
    assert!(export.contains("void main() {"));
    assert!(!export.contains("enum Role"));
}
