//! Shared test scaffolding for Deft, in the spirit of `cargo-test-support`:
//! a small builder for laying out a workspace (manifests and whatever else
//! a test needs) on disk in a `tempfile::TempDir`, so modules that read
//! real paths (`deft::core::workspace`, `deft::core::registry`) can be
//! exercised without hand-rolling `fs::write` calls in every test.
//!
//! This crate intentionally knows nothing about Deft's own types: it just
//! writes files. Fixtures that need `deft`'s `Catalog`/`SourceFetcher`
//! types (fake catalogs, fake fetchers) live in `deft-resolver-tests`
//! instead, mirroring the split between `cargo-test-support` (generic) and
//! `resolver-tests` (depends on `cargo` itself).

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builds a directory tree of text files, then hands back the root.
pub struct ProjectBuilder {
    root: TempDir,
    files: Vec<(PathBuf, String)>,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        ProjectBuilder {
            root: tempfile::tempdir().expect("create tempdir"),
            files: Vec::new(),
        }
    }

    /// Queues a file to be written relative to the project root.
    pub fn file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.files.push((path.as_ref().to_path_buf(), contents.into()));
        self
    }

    /// A convenience for writing a `dylan-package.json` at `dir` (the
    /// workspace root for a single-package layout, or a subdirectory for a
    /// multi-package member).
    pub fn package_manifest(
        self,
        dir: impl AsRef<Path>,
        name: &str,
        version: &str,
        deps: &[&str],
        dev_deps: &[&str],
    ) -> Self {
        let body = serde_json::json!({
            "name": name,
            "version": version,
            "dependencies": deps,
            "dev-dependencies": dev_deps,
        });
        self.file(
            dir.as_ref().join("dylan-package.json"),
            serde_json::to_string_pretty(&body).unwrap(),
        )
    }

    pub fn workspace_manifest(self, default_library: Option<&str>) -> Self {
        let body = match default_library {
            Some(lib) => serde_json::json!({ "default-library": lib }),
            None => serde_json::json!({}),
        };
        self.file("workspace.json", serde_json::to_string_pretty(&body).unwrap())
    }

    /// Writes all queued files, creating parent directories as needed, and
    /// returns the (still-owned) `TempDir` so it lives as long as the
    /// caller needs the paths to exist.
    pub fn build(self) -> TempDir {
        for (path, contents) in &self.files {
            let full = self.root.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).expect("create parent dir");
            }
            fs::write(&full, contents).expect("write fixture file");
        }
        self.root
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a trivial `.lid` file at `path`, relative to `root`.
pub fn write_lid(root: &Path, path: impl AsRef<Path>, contents: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(full, contents).expect("write lid file");
}
