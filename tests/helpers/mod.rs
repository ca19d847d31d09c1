//! Test harness for end-to-end report tests.
//!
//! Copies a fixture project into a temp dir and exposes a ready
//! [`ScanConfig`] pointing at its `lib/` and `assets/` directories.

pub mod fixtures;

use dartscope::types::ScanConfig;
use std::path::Path;
use tempfile::TempDir;

pub struct TestProject {
    pub config: ScanConfig,
    temp_dir: TempDir,
}

impl TestProject {
    /// Create a project from a named fixture directory under `tests/fixtures`.
    pub fn from_fixture(name: &str) -> Self {
        let fixture_src =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
        assert!(fixture_src.exists(), "Fixture '{name}' not found at {}", fixture_src.display());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fixtures::copy_dir_recursive(&fixture_src, temp_dir.path());

        let config = ScanConfig::new(
            temp_dir.path().join("lib"),
            temp_dir.path().join("assets"),
        );
        Self { config, temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}
