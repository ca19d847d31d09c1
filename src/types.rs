use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum rendered parameter-list length before truncation.
pub const MAX_PARAMS_LEN: usize = 120;

/// Identifier-shaped keywords that can never be member or symbol names.
pub const INVALID_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "try", "catch", "else", "do", "case", "default", "return",
];

pub fn is_invalid_name(name: &str) -> bool {
    INVALID_NAMES.contains(&name)
}

/// Collapse internal whitespace and truncate overly long parameter lists
/// with a trailing ellipsis marker. Bounds output size for pathological
/// signatures without failing.
pub fn clean_params(params: &str) -> String {
    let mut out = String::with_capacity(params.len().min(MAX_PARAMS_LEN));
    let mut last_space = true;
    for c in params.trim().chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(c);
            last_space = false;
        }
    }
    let out = out.trim_end().to_string();
    if out.chars().count() > MAX_PARAMS_LEN {
        let head: String = out.chars().take(MAX_PARAMS_LEN - 3).collect();
        format!("{head}...")
    } else {
        out
    }
}

// ---------------------------------------------------------------------------
// Symbols
// ---------------------------------------------------------------------------

/// Kinds of symbols the outline reports, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Mixin,
    Enum,
    Extension,
    Typedef,
    Function,
    Getter,
    Setter,
    Provider,
    Route,
    Ctor,
    Method,
    Operator,
}

impl SymbolKind {
    /// Section label used by the text report (`[CLASS]`, `[ENUM]`, ...).
    pub fn label(self) -> &'static str {
        match self {
            SymbolKind::Class => "CLASS",
            SymbolKind::Mixin => "MIXIN",
            SymbolKind::Enum => "ENUM",
            SymbolKind::Extension => "EXTENSION",
            SymbolKind::Typedef => "TYPEDEF",
            SymbolKind::Function => "FUNCTION",
            SymbolKind::Getter => "GETTER",
            SymbolKind::Setter => "SETTER",
            SymbolKind::Provider => "PROVIDER",
            SymbolKind::Route => "ROUTE",
            SymbolKind::Ctor => "CTOR",
            SymbolKind::Method => "METHOD",
            SymbolKind::Operator => "OPERATOR",
        }
    }
}

/// Report order for non-class top-level symbol groups.
pub const TOP_LEVEL_GROUP_ORDER: &[SymbolKind] = &[
    SymbolKind::Mixin,
    SymbolKind::Enum,
    SymbolKind::Extension,
    SymbolKind::Typedef,
    SymbolKind::Function,
    SymbolKind::Getter,
    SymbolKind::Setter,
    SymbolKind::Provider,
    SymbolKind::Route,
];

/// One extracted symbol. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// Owning class name for members; `None` for top-level symbols.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub name: String,
    /// Rendered parameter list or target description; may be empty.
    pub extra: String,
    /// 1-based source line.
    pub line: usize,
}

// ---------------------------------------------------------------------------
// Scan configuration — CLI flags merged over .dartscope.toml
// ---------------------------------------------------------------------------

/// Runtime configuration for indexing. Defaults match the bare CLI.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory to index (typically a Flutter project's `lib/`).
    pub lib_dir: PathBuf,
    /// Assets directory rendered in the report's tree section.
    pub assets_dir: PathBuf,
    /// Extensions to include (normalized without a leading dot).
    /// Empty = all text files.
    pub extensions: HashSet<String>,
    /// Gitignore-style glob patterns to exclude.
    pub exclude_globs: Vec<String>,
    /// Skip files larger than this many KiB.
    pub max_size_kb: Option<u64>,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Only include files tracked in the enclosing git repository.
    pub git_only: bool,
}

impl ScanConfig {
    pub fn new(lib_dir: PathBuf, assets_dir: PathBuf) -> Self {
        Self {
            lib_dir,
            assets_dir,
            extensions: HashSet::new(),
            exclude_globs: Vec::new(),
            max_size_kb: None,
            skip_hidden: true,
            git_only: false,
        }
    }
}

// ---------------------------------------------------------------------------
// File index
// ---------------------------------------------------------------------------

/// One row of the numbered file index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    /// Stable 1-based number within this run.
    pub num: usize,
    /// Path relative to the indexed directory, `/`-separated.
    pub path: String,
    pub lines: usize,
    pub bytes: u64,
}
