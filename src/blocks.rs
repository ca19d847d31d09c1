// ---------------------------------------------------------------------------
// Class block location — declaration line + balanced body span
// ---------------------------------------------------------------------------

use regex::Regex;

use crate::lexer::LineScan;

/// A located type declaration with a syntactically balanced body.
///
/// Line numbers are 1-based. `open_line` is the line carrying the first
/// code-only `{` after the declaration; `close_line` is where the running
/// brace depth first returns to zero. The code-only brace count over
/// `open_line..=close_line` nets to exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBlock {
    pub name: String,
    pub decl_line: usize,
    pub open_line: usize,
    pub close_line: usize,
}

/// Dart 3 class declaration: optional `abstract`/`base`/`interface`/`final`/
/// `sealed` modifiers, optional `mixin` qualifier, then `class Name`.
pub fn class_decl_re() -> Regex {
    Regex::new(
        r"^\s*(?:(?:abstract|base|interface|final|sealed)\s+)*(?:mixin\s+)?class\s+([A-Za-z_]\w*)\b",
    )
    .unwrap()
}

/// Locate every class block in the pre-scanned lines.
///
/// Scanning resumes after a located block's close line, so nested class
/// declarations inside an already-consumed span are not re-entered. A body
/// that never balances before end of file is discarded (not an error) and
/// scanning resumes one line after the declaration.
pub fn locate_class_blocks(scans: &[LineScan]) -> Vec<ClassBlock> {
    let decl_re = class_decl_re();
    let n = scans.len();
    let mut blocks = Vec::new();

    let mut i = 0usize;
    while i < n {
        let m = match decl_re.captures(&scans[i].code) {
            Some(m) => m,
            None => {
                i += 1;
                continue;
            }
        };
        let name = m[1].to_string();

        // Walk forward from the declaration line accumulating code-only
        // brace depth; the depth counter seeds at the first line with a `{`.
        let mut depth: i64 = 0;
        let mut open_line: Option<usize> = None;
        let mut close_line: Option<usize> = None;
        let mut j = i;
        while j < n {
            let scan = &scans[j];
            if open_line.is_none() {
                if scan.opens > 0 {
                    open_line = Some(j + 1);
                    depth = scan.delta();
                }
            } else {
                depth += scan.delta();
            }
            if open_line.is_some() && depth == 0 {
                close_line = Some(j + 1);
                break;
            }
            j += 1;
        }

        match (open_line, close_line) {
            (Some(open), Some(close)) => {
                blocks.push(ClassBlock { name, decl_line: i + 1, open_line: open, close_line: close });
                i = j + 1;
            }
            _ => {
                // Unterminated body: drop the block and move on.
                i += 1;
            }
        }
    }

    blocks
}
