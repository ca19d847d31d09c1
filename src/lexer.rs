// ---------------------------------------------------------------------------
// Lexical line scanner — code/comment/string classification
// ---------------------------------------------------------------------------

/// Lexical state carried from one physical line to the next.
///
/// At most one of "inside a block comment" (`block_depth > 0`) and
/// "inside a string" (`in_string`) is true at a time. `triple` and `raw`
/// are only meaningful while `in_string` is set. Line comments (`//`)
/// never carry state across a line boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanState {
    /// Block comment nesting depth. Dart allows `/* /* */ */`.
    pub block_depth: u32,
    pub in_string: bool,
    /// Opening delimiter of the current string: `'` or `"`.
    pub string_delim: char,
    /// Inside a `'''` / `"""` triple-quoted string.
    pub triple: bool,
    /// Raw string (`r'...'`): backslash is an ordinary character.
    pub raw: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result of scanning one physical line.
#[derive(Debug, Clone, Default)]
pub struct LineScan {
    /// Count of `{` appearing in code (outside comments and strings).
    pub opens: u32,
    /// Count of `}` appearing in code.
    pub closes: u32,
    /// The line's code-only text: comments and string bodies elided.
    pub code: String,
}

impl LineScan {
    /// Net brace delta for this line.
    pub fn delta(&self) -> i64 {
        self.opens as i64 - self.closes as i64
    }
}

/// Scan one line, consuming `state` and returning the state to thread into
/// the next line.
///
/// Braces inside comments or string literals never reach the counts or the
/// cleaned text. An unterminated string or block comment simply leaves the
/// returned state open; the caller tolerates that (possibly to end of file).
pub fn scan_line(line: &str, mut state: ScanState) -> (LineScan, ScanState) {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(line.len());
    let mut opens = 0u32;
    let mut closes = 0u32;
    let mut i = 0usize;

    while i < n {
        let c = chars[i];

        // Inside a block comment: only `/*` and `*/` matter.
        if state.block_depth > 0 {
            if c == '/' && i + 1 < n && chars[i + 1] == '*' {
                state.block_depth += 1;
                i += 2;
                continue;
            }
            if c == '*' && i + 1 < n && chars[i + 1] == '/' {
                state.block_depth -= 1;
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        // Inside a string literal.
        if state.in_string {
            if state.triple {
                // Triple-quoted strings close only on three consecutive delimiters.
                if c == state.string_delim
                    && i + 2 < n
                    && chars[i + 1] == c
                    && chars[i + 2] == c
                {
                    state.in_string = false;
                    state.triple = false;
                    i += 3;
                } else {
                    i += 1;
                }
                continue;
            }
            if !state.raw && c == '\\' {
                // Escape consumes the next character, uninterpreted.
                i += 2;
                continue;
            }
            if c == state.string_delim {
                state.in_string = false;
            }
            i += 1;
            continue;
        }

        // In code: a line comment ends scanning for this line.
        if c == '/' && i + 1 < n && chars[i + 1] == '/' {
            break;
        }
        if c == '/' && i + 1 < n && chars[i + 1] == '*' {
            state.block_depth += 1;
            i += 2;
            continue;
        }
        if c == '\'' || c == '"' {
            state.in_string = true;
            state.string_delim = c;
            state.raw = i > 0 && chars[i - 1] == 'r';
            if i + 2 < n && chars[i + 1] == c && chars[i + 2] == c {
                state.triple = true;
                i += 3;
            } else {
                state.triple = false;
                i += 1;
            }
            continue;
        }

        if c == '{' {
            opens += 1;
        } else if c == '}' {
            closes += 1;
        }
        out.push(c);
        i += 1;
    }

    (LineScan { opens, closes, code: out }, state)
}

/// Scan a whole file into per-line records with one threaded state.
///
/// Every downstream phase (block location, signature aggregation, top-level
/// matching) shares these records, so comment/string classification can
/// never disagree between phases.
pub fn scan_lines(text: &str) -> Vec<LineScan> {
    let mut state = ScanState::new();
    let mut scans = Vec::new();
    for line in text.lines() {
        let (scan, next) = scan_line(line, state);
        scans.push(scan);
        state = next;
    }
    scans
}
