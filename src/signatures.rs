// ---------------------------------------------------------------------------
// Member signatures — multi-line aggregation and classification
// ---------------------------------------------------------------------------

use regex::Regex;

use crate::lexer::LineScan;
use crate::types::{clean_params, is_invalid_name, Symbol, SymbolKind};

/// One complete member declaration, reassembled from any number of physical
/// lines with fragments joined by single spaces. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub text: String,
    /// 1-based line of the first fragment.
    pub start_line: usize,
}

// ---------------------------------------------------------------------------
// Aggregation at class-local depth 1
// ---------------------------------------------------------------------------

fn looks_like_member_start(code: &str) -> bool {
    if code.contains('(') {
        return true;
    }
    // Keyword may follow a return type ("int get bar"), so match it as a
    // token anywhere in the line, not only as a prefix.
    let padded = format!(" {code} ");
    padded.contains(" get ") || padded.contains(" set ") || padded.contains(" operator ")
}

fn has_terminator(fragment: &str) -> bool {
    fragment.contains("=>") || fragment.contains('{') || fragment.contains(';')
}

/// Walk a class span (1-based `open_line..=close_line`) and reassemble
/// member signatures declared at the class's immediate nesting level.
///
/// Local depth is measured relative to the class's own opening brace, so the
/// body is depth 1. Only depth-1 lines begin or continue a candidate; method
/// bodies and nested blocks pass through untouched while the running depth
/// is tracked so the walk knows when it is back at the member level. A
/// candidate completes on the first fragment where the running parenthesis
/// balance is ≤ 0 and a terminator (`=>`, `{`, `;`) appears.
pub fn aggregate_signatures(
    scans: &[LineScan],
    open_line: usize,
    close_line: usize,
) -> Vec<Signature> {
    let mut results = Vec::new();
    let mut depth: i64 = 0;
    let mut collecting = false;
    let mut buf: Vec<String> = Vec::new();
    let mut first_line = 0usize;
    let mut paren: i64 = 0;

    for lno in open_line..=close_line.min(scans.len()) {
        let scan = &scans[lno - 1];
        let code = scan.code.trim();

        if depth == 1 && !code.is_empty() {
            if !collecting {
                if looks_like_member_start(code) {
                    collecting = true;
                    buf.clear();
                    buf.push(code.to_string());
                    first_line = lno;
                    paren = paren_delta(code);
                    if paren <= 0 && has_terminator(code) {
                        results.push(Signature { text: buf.join(" "), start_line: first_line });
                        collecting = false;
                        paren = 0;
                    }
                }
            } else {
                buf.push(code.to_string());
                paren += paren_delta(code);
                if paren <= 0 && has_terminator(code) {
                    results.push(Signature { text: buf.join(" "), start_line: first_line });
                    collecting = false;
                    paren = 0;
                }
            }
        }

        depth += scan.delta();
    }

    results
}

fn paren_delta(code: &str) -> i64 {
    let opens = code.matches('(').count() as i64;
    let closes = code.matches(')').count() as i64;
    opens - closes
}

// ---------------------------------------------------------------------------
// Classification — ordered, first-match-wins member matchers
// ---------------------------------------------------------------------------

// Annotation blocks (`@override`, `@Deprecated('x')`, ...).
const ANN: &str = r"(?:@[\w.()<>\[\],\s]+?\s+)*";

/// Matchers shared by every class; compiled once and reused.
pub struct MemberMatchers {
    end_re: Regex,
    annots_re: Regex,
    mods_re: Regex,
    type_head_re: Regex,
    getter_re: Regex,
    setter_re: Regex,
    operator_re: Regex,
    method_re: Regex,
    ws_re: Regex,
}

impl Default for MemberMatchers {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberMatchers {
    pub fn new() -> Self {
        Self {
            end_re: Regex::new(r"\s*(?:async\*?|sync\*?)?\s*(?:=>|\{|;)\s*$").unwrap(),
            annots_re: Regex::new(r"^(?:@[\w.()<>\[\],\s]+\s+)+").unwrap(),
            mods_re: Regex::new(
                r"^(?:override\s+)?(?:(?:external|static|covariant|required|late|final)\s+)*",
            )
            .unwrap(),
            type_head_re: Regex::new(r"^(?:void|dynamic|[A-Za-z_]\w*)").unwrap(),
            getter_re: Regex::new(r"^get\s+([A-Za-z_]\w*)$").unwrap(),
            setter_re: Regex::new(r"^set\s+([A-Za-z_]\w*)\s*\((?P<params>.*)\)$").unwrap(),
            operator_re: Regex::new(r"^operator\s+([^\s(]+)\s*\((?P<params>.*)\)$").unwrap(),
            method_re: Regex::new(
                r"^(?P<name>[A-Za-z_]\w*)\s*(?:<[^>]*>)?\s*\((?P<params>.*)\)$",
            )
            .unwrap(),
            ws_re: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Normalize an aggregated signature down to its member shape:
    /// drop the trailing terminator, the expression body after `=>`, leading
    /// annotations and modifiers, and (except for getter/setter/operator
    /// forms) the leading return type.
    fn preclean(&self, sig: &str) -> String {
        let s = self.end_re.replace(sig.trim(), "").into_owned();
        // Expression bodies keep their code on the same fragment; everything
        // from the first `=>` on is body, not shape.
        let s = match s.find("=>") {
            Some(pos) => s[..pos].trim_end().to_string(),
            None => s,
        };
        let s = self.annots_re.replace(&s, "").into_owned();
        let s = self.mods_re.replace(&s, "").into_owned();
        let head = s.trim_start();
        let s = if head.starts_with("get ")
            || head.starts_with("set ")
            || head.starts_with("operator ")
        {
            head.to_string()
        } else {
            self.strip_return_type(&s)
        };
        self.ws_re.replace_all(&s, " ").trim().to_string()
    }

    /// Remove a leading return type, skipping one balanced run of nested
    /// angle-bracket generics and an optional trailing `?`. Depth-counting
    /// `<`/`>` is what keeps `Map<String, List<int>>` from being confused
    /// with comparison operators.
    fn strip_return_type(&self, s: &str) -> String {
        let s = s.trim_start();
        if s.starts_with("get ") || s.starts_with("set ") || s.starts_with("operator ") {
            return s.trim().to_string();
        }
        let m = match self.type_head_re.find(s) {
            Some(m) => m,
            None => return s.trim().to_string(),
        };
        let chars: Vec<char> = s.chars().collect();
        let n = chars.len();
        let mut j = s[..m.end()].chars().count();

        if j < n && chars[j] == '<' {
            let mut depth = 0i64;
            while j < n {
                match chars[j] {
                    '<' => depth += 1,
                    '>' => {
                        depth -= 1;
                        if depth == 0 {
                            j += 1;
                            break;
                        }
                    }
                    _ => {}
                }
                j += 1;
            }
            // Residual closers from shorthand like `>>`.
            while j < n && chars[j] == '>' {
                j += 1;
            }
        }

        if j < n && chars[j] == '?' {
            j += 1;
        }
        while j < n && chars[j].is_whitespace() {
            j += 1;
        }

        chars[j..].iter().collect::<String>().trim().to_string()
    }

    /// Classify one aggregated signature against the ordered member shapes.
    /// Returns `None` for anything that matches no shape — a tolerated drop,
    /// not an error.
    pub fn classify(&self, ctors: &CtorMatchers, sig: &Signature) -> Option<Symbol> {
        if let Some(sym) = ctors.classify(sig) {
            return Some(sym);
        }

        let clean = self.preclean(&sig.text);

        if let Some(m) = self.getter_re.captures(&clean) {
            let name = m[1].to_string();
            if is_invalid_name(&name) {
                return None;
            }
            return Some(Symbol {
                kind: SymbolKind::Getter,
                owner: Some(ctors.class_name.clone()),
                name,
                extra: String::new(),
                line: sig.start_line,
            });
        }

        if let Some(m) = self.setter_re.captures(&clean) {
            let name = m[1].to_string();
            if is_invalid_name(&name) {
                return None;
            }
            let params = clean_params(m.name("params").map_or("", |p| p.as_str()));
            return Some(Symbol {
                kind: SymbolKind::Setter,
                owner: Some(ctors.class_name.clone()),
                name,
                extra: format!("({params})"),
                line: sig.start_line,
            });
        }

        if let Some(m) = self.operator_re.captures(&clean) {
            let op = m[1].to_string();
            let params = clean_params(m.name("params").map_or("", |p| p.as_str()));
            return Some(Symbol {
                kind: SymbolKind::Operator,
                owner: Some(ctors.class_name.clone()),
                name: format!("operator {op}"),
                extra: format!("({params})"),
                line: sig.start_line,
            });
        }

        if let Some(m) = self.method_re.captures(&clean) {
            let name = m.name("name").unwrap().as_str().to_string();
            if is_invalid_name(&name) {
                return None;
            }
            let params = clean_params(m.name("params").map_or("", |p| p.as_str()));
            return Some(Symbol {
                kind: SymbolKind::Method,
                owner: Some(ctors.class_name.clone()),
                name,
                extra: format!("({params})"),
                line: sig.start_line,
            });
        }

        None
    }
}

/// Constructor matchers bound to one class name: the bare `Foo(...)` form
/// and the named `Foo.bar(...)` form, both allowing annotations and
/// `external`/`const`/`factory`, terminated by an inline body, an opening
/// brace, a statement end, a `=` redirection, or an initializer-list colon.
pub struct CtorMatchers {
    class_name: String,
    bare_re: Regex,
    named_re: Regex,
}

impl CtorMatchers {
    pub fn for_class(class_name: &str) -> Self {
        let esc = regex::escape(class_name);
        let bare_re = Regex::new(&format!(
            r"^\s*{ANN}(?:external\s+)?(?:const\s+)?(?:factory\s+)?{esc}\s*\(.*\)\s*(?:=>|\{{|;|=|:)"
        ))
        .unwrap();
        let named_re = Regex::new(&format!(
            r"^\s*{ANN}(?:external\s+)?(?:const\s+)?(?:factory\s+)?{esc}\.(?P<id>[A-Za-z_]\w*)\s*\(.*\)\s*(?:=>|\{{|;|=|:)"
        ))
        .unwrap();
        Self { class_name: class_name.to_string(), bare_re, named_re }
    }

    fn classify(&self, sig: &Signature) -> Option<Symbol> {
        let text = sig.text.trim_end();
        if self.bare_re.is_match(text) {
            return Some(Symbol {
                kind: SymbolKind::Ctor,
                owner: Some(self.class_name.clone()),
                name: self.class_name.clone(),
                extra: "(…)".to_string(),
                line: sig.start_line,
            });
        }
        if let Some(m) = self.named_re.captures(text) {
            let id = m.name("id").unwrap().as_str();
            return Some(Symbol {
                kind: SymbolKind::Ctor,
                owner: Some(self.class_name.clone()),
                name: format!("{}.{id}", self.class_name),
                extra: "(…)".to_string(),
                line: sig.start_line,
            });
        }
        None
    }
}
