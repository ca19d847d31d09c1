// ---------------------------------------------------------------------------
// Top-level symbol scanning at global depth 0
// ---------------------------------------------------------------------------

use regex::Regex;

use crate::blocks::class_decl_re;
use crate::lexer::LineScan;
use crate::types::{clean_params, is_invalid_name, Symbol, SymbolKind};

/// Ordered single-line matchers for top-level declarations. First match
/// wins; a line yields at most one symbol. All patterns run against the
/// code-only text except the route matcher, which needs the string literals
/// that cleaned text elides (see [`TopLevelMatchers::match_line`]).
pub struct TopLevelMatchers {
    class_re: Regex,
    mixin_re: Regex,
    enum_re: Regex,
    extension_re: Regex,
    typedef_re: Regex,
    function_re: Regex,
    getter_re: Regex,
    setter_re: Regex,
    provider_re: Regex,
    route_re: Regex,
}

impl Default for TopLevelMatchers {
    fn default() -> Self {
        Self::new()
    }
}

impl TopLevelMatchers {
    pub fn new() -> Self {
        Self {
            class_re: class_decl_re(),
            mixin_re: Regex::new(r"^\s*(?:base\s+)?mixin\s+([A-Za-z_]\w*)").unwrap(),
            enum_re: Regex::new(r"^\s*enum\s+([A-Za-z_]\w*)").unwrap(),
            extension_re: Regex::new(
                r"^\s*extension\s+([A-Za-z_]\w*)?\s+on\s+([A-Za-z_][\w<>,\s?]+)",
            )
            .unwrap(),
            typedef_re: Regex::new(r"^\s*typedef\s+([A-Za-z_]\w*)\s*=\s*([^;]+);").unwrap(),
            function_re: Regex::new(
                r"^\s*(?:@[\w.()]+\s*)*(?:external\s+)?(?:static\s+)?(?:void|dynamic|[A-Za-z_]\w*(?:<[^>]*>)*>{0,5}(?:\s*\?)?)\s+([A-Za-z_]\w*)\s*\(([^;{)]*)\)\s*(?:async\*?|sync\*?)?\s*(?:=>|\{)",
            )
            .unwrap(),
            getter_re: Regex::new(
                r"^\s*(?:@[\w.()]+\s*)*(?:external\s+)?(?:static\s+)?(?:\w[\w<>,? ]*\s+)?get\s+([A-Za-z_]\w*)\s*=>",
            )
            .unwrap(),
            setter_re: Regex::new(
                r"^\s*(?:@[\w.()]+\s*)*(?:external\s+)?(?:static\s+)?set\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*(?:=>|\{)",
            )
            .unwrap(),
            provider_re: Regex::new(
                r"^\s*final\s+([A-Za-z_]\w*Provider)\s*=\s*(?:Provider|StateProvider|FutureProvider|StreamProvider|NotifierProvider|AutoDispose\w*Provider)\b",
            )
            .unwrap(),
            route_re: Regex::new(
                r#"^\s*GoRoute\(\s*name:\s*["']([^"']+)["']\s*,\s*path:\s*["']([^"']+)["']"#,
            )
            .unwrap(),
        }
    }

    /// Match one physical line. `code` is the classifier-cleaned text used
    /// for every pattern; `raw` is consulted only by the route matcher,
    /// gated on the cleaned text so commented-out routes never match.
    pub fn match_line(&self, code: &str, raw: &str, line: usize) -> Option<Symbol> {
        if let Some(m) = self.class_re.captures(code) {
            return named(SymbolKind::Class, &m[1], String::new(), line);
        }
        if let Some(m) = self.mixin_re.captures(code) {
            return named(SymbolKind::Mixin, &m[1], String::new(), line);
        }
        if let Some(m) = self.enum_re.captures(code) {
            return named(SymbolKind::Enum, &m[1], String::new(), line);
        }
        if let Some(m) = self.extension_re.captures(code) {
            let name = m.get(1).map_or("(anonymous)", |g| g.as_str());
            let target = m[2].trim().to_string();
            return named(SymbolKind::Extension, name, format!("on {target}"), line);
        }
        if let Some(m) = self.typedef_re.captures(code) {
            return named(SymbolKind::Typedef, &m[1], String::new(), line);
        }
        if let Some(m) = self.function_re.captures(code) {
            let params = clean_params(m.get(2).map_or("", |g| g.as_str()));
            return named(SymbolKind::Function, &m[1], format!("({params})"), line);
        }
        if let Some(m) = self.getter_re.captures(code) {
            return named(SymbolKind::Getter, &m[1], String::new(), line);
        }
        if let Some(m) = self.setter_re.captures(code) {
            let params = clean_params(m.get(2).map_or("", |g| g.as_str()));
            return named(SymbolKind::Setter, &m[1], format!("({params})"), line);
        }
        if let Some(m) = self.provider_re.captures(code) {
            return named(SymbolKind::Provider, &m[1], String::new(), line);
        }
        // Route names and paths live inside string literals, which the
        // cleaned text drops; match the raw line but only where the cleaned
        // text still shows the construction in code.
        if code.contains("GoRoute(") {
            if let Some(m) = self.route_re.captures(raw) {
                return named(SymbolKind::Route, &m[1], m[2].to_string(), line);
            }
        }
        None
    }
}

fn named(kind: SymbolKind, name: &str, extra: String, line: usize) -> Option<Symbol> {
    if is_invalid_name(name) {
        return None;
    }
    Some(Symbol { kind, owner: None, name: name.to_string(), extra, line })
}

/// Scan all lines, emitting symbols only where the global brace depth is
/// zero. Depth bookkeeping reuses the classifier's code-only counts,
/// applied after each line is inspected.
pub fn scan_top_level(scans: &[LineScan], raw_lines: &[&str]) -> Vec<Symbol> {
    let matchers = TopLevelMatchers::new();
    let mut symbols = Vec::new();
    let mut depth: i64 = 0;

    for (i, scan) in scans.iter().enumerate() {
        if depth == 0 {
            let raw = raw_lines.get(i).copied().unwrap_or("");
            if let Some(sym) = matchers.match_line(&scan.code, raw, i + 1) {
                symbols.push(sym);
            }
        }
        depth += scan.delta();
    }

    symbols
}
