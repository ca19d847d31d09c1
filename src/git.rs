// ---------------------------------------------------------------------------
// Git-tracked file lookup for --git-only
// ---------------------------------------------------------------------------

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Relative paths (to `lib_dir`, `/`-separated) of files tracked by the
/// enclosing git repository. On any git failure the set is empty and a
/// warning is logged, so `--git-only` degrades to "nothing matches"
/// instead of aborting the run.
pub fn tracked_files(lib_dir: &Path) -> HashSet<String> {
    match list_tracked(lib_dir) {
        Ok(set) => set,
        Err(e) => {
            warn!(dir = %lib_dir.display(), error = %e, "Not a git repository or index unreadable");
            HashSet::new()
        }
    }
}

fn list_tracked(lib_dir: &Path) -> Result<HashSet<String>, git2::Error> {
    let repo = git2::Repository::discover(lib_dir)?;
    let workdir: PathBuf = repo
        .workdir()
        .ok_or_else(|| git2::Error::from_str("bare repository has no worktree"))?
        .canonicalize()
        .map_err(|e| git2::Error::from_str(&e.to_string()))?;
    let lib_canon = lib_dir.canonicalize().unwrap_or_else(|_| lib_dir.to_path_buf());

    let index = repo.index()?;
    let mut set = HashSet::new();
    for entry in index.iter() {
        let rel = String::from_utf8_lossy(&entry.path).into_owned();
        let abs = workdir.join(&rel);
        if let Ok(under_lib) = abs.strip_prefix(&lib_canon) {
            set.insert(under_lib.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_failure_is_nonfatal() {
        // A directory with no enclosing repository must come back empty,
        // not panic or error out.
        let dir = tempfile::tempdir().unwrap();
        let set = tracked_files(dir.path());
        assert!(set.is_empty());
    }
}
