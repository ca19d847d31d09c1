// ---------------------------------------------------------------------------
// Outline assembly — one report per file
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::blocks::locate_class_blocks;
use crate::lexer::scan_lines;
use crate::signatures::{aggregate_signatures, CtorMatchers, MemberMatchers};
use crate::toplevel::scan_top_level;
use crate::types::{Symbol, SymbolKind};

/// Structural outline of one file: top-level symbols plus, when member
/// extraction is enabled, the classified members of each located class.
///
/// Members whose owning class span was located but whose name never made it
/// into the top-level class symbols are orphans — surfaced explicitly,
/// never dropped, so consumers can see locator/scanner disagreement.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileOutline {
    pub top_level: Vec<Symbol>,
    /// Class name → members, each list sorted by source line.
    pub members_by_class: BTreeMap<String, Vec<Symbol>>,
    /// Members with no matching top-level class, sorted by (owner, line).
    pub orphans: Vec<Symbol>,
}

impl FileOutline {
    /// Top-level symbols of class kind, in encounter order.
    pub fn classes(&self) -> impl Iterator<Item = &Symbol> {
        self.top_level.iter().filter(|s| s.kind == SymbolKind::Class)
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty() && self.members_by_class.is_empty() && self.orphans.is_empty()
    }
}

/// Extract the outline of one decoded text buffer.
///
/// Pure and single-pass: the file is lexed once into per-line scan records
/// shared by every phase, so running this twice on the same text yields
/// identical output. Malformed input (unterminated bodies, open strings,
/// unclassifiable signatures) degrades to a smaller outline, never a
/// failure.
pub fn outline_text(text: &str, include_members: bool) -> FileOutline {
    let scans = scan_lines(text);
    let raw_lines: Vec<&str> = text.lines().collect();

    let top_level = scan_top_level(&scans, &raw_lines);

    let mut members_by_class: BTreeMap<String, Vec<Symbol>> = BTreeMap::new();
    if include_members {
        let matchers = MemberMatchers::new();
        for block in locate_class_blocks(&scans) {
            let ctors = CtorMatchers::for_class(&block.name);
            let mut members: Vec<Symbol> = aggregate_signatures(
                &scans,
                block.open_line,
                block.close_line,
            )
            .iter()
            .filter_map(|sig| matchers.classify(&ctors, sig))
            .collect();
            if members.is_empty() {
                continue;
            }
            members.sort_by_key(|m| m.line);
            members_by_class.entry(block.name.clone()).or_default().append(&mut members);
        }
    }

    // Split off members whose class the top-level scanner never reported.
    let known: HashSet<&str> = top_level
        .iter()
        .filter(|s| s.kind == SymbolKind::Class)
        .map(|s| s.name.as_str())
        .collect();
    let orphan_names: Vec<String> =
        members_by_class.keys().filter(|k| !known.contains(k.as_str())).cloned().collect();
    let mut orphans = Vec::new();
    for name in orphan_names {
        if let Some(mut list) = members_by_class.remove(&name) {
            orphans.append(&mut list);
        }
    }
    orphans.sort_by(|a, b| {
        (a.owner.as_deref().unwrap_or(""), a.line).cmp(&(b.owner.as_deref().unwrap_or(""), b.line))
    });

    FileOutline { top_level, members_by_class, orphans }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_with_ctor_getter_method() {
        let src = "class Foo {\n  Foo(this.x);\n  int get bar => x;\n  void baz() {\n    if (x) {}\n  }\n}\n";
        let outline = outline_text(src, true);

        let classes: Vec<&Symbol> = outline.classes().collect();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Foo");
        assert_eq!(classes[0].line, 1);

        let members = &outline.members_by_class["Foo"];
        let described: Vec<(SymbolKind, &str, usize)> =
            members.iter().map(|m| (m.kind, m.name.as_str(), m.line)).collect();
        assert_eq!(
            described,
            vec![
                (SymbolKind::Ctor, "Foo", 2),
                (SymbolKind::Getter, "bar", 3),
                (SymbolKind::Method, "baz", 4),
            ]
        );
        assert!(outline.orphans.is_empty());
    }

    #[test]
    fn string_brace_does_not_break_class_depth() {
        let src = "class Foo {\n  final s = \"{ not a brace }\";\n  void go() {\n  }\n}\n";
        let outline = outline_text(src, true);
        assert_eq!(outline.classes().count(), 1);
        let members = &outline.members_by_class["Foo"];
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "go");
    }

    #[test]
    fn block_comment_class_produces_nothing() {
        let src = "/*\nclass Ghost {\n  Ghost();\n}\n*/\n";
        let outline = outline_text(src, true);
        assert!(outline.is_empty());
    }

    #[test]
    fn unterminated_class_yields_empty_outline() {
        let src = "class Gone {\n  Gone();\n  void lost() {\n";
        let outline = outline_text(src, true);
        assert!(outline.classes().next().is_none());
        assert!(outline.members_by_class.is_empty());
        assert!(outline.orphans.is_empty());
    }

    #[test]
    fn members_disabled_leaves_top_level_only() {
        let src = "class Foo {\n  Foo();\n}\n";
        let outline = outline_text(src, false);
        assert_eq!(outline.classes().count(), 1);
        assert!(outline.members_by_class.is_empty());
    }

    #[test]
    fn top_level_kinds_collected_alongside_classes() {
        let src = "enum Color { red }\nclass Foo {\n  Foo();\n}\nFuture<void> boot() async {\n}\n";
        let outline = outline_text(src, true);
        let kinds: Vec<SymbolKind> = outline.top_level.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SymbolKind::Enum, SymbolKind::Class, SymbolKind::Function]);
        assert_eq!(outline.members_by_class["Foo"].len(), 1);
    }

    #[test]
    fn idempotent_over_identical_input() {
        let src = "class Foo {\n  Foo(this.x);\n  int get bar => x;\n}\nenum E { a }\n";
        let a = outline_text(src, true);
        let b = outline_text(src, true);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn orphan_members_surface_when_class_not_top_level() {
        // A class declared inside a function body: the locator still finds
        // its span, but the depth-0 scanner never reports the class, so its
        // members surface as orphans instead of vanishing.
        let src = "void wrap() {\n  class Local {\n    Local();\n    int get n => 1;\n  }\n}\n";
        let outline = outline_text(src, true);
        assert!(outline.classes().next().is_none());
        assert!(outline.members_by_class.is_empty());
        let names: Vec<&str> = outline.orphans.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Local", "n"]);
        assert_eq!(outline.orphans[0].owner.as_deref(), Some("Local"));
    }
}
