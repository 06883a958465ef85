//! Raw deserialization shapes for the two manifest files: `dylan-package.json`
//! (and its legacy/alias names) and `workspace.json`. These structs carry no
//! validation beyond what `serde` gives for free; `deft::core::workspace` is
//! responsible for turning them into a `Release`/`Workspace` and for deciding
//! what a missing/invalid field means.

use serde::Deserialize;

/// The two recognized manifest filenames: `dylan-package.json` is canonical,
/// `deft-package.json` is accepted as an alias, and the legacy `pkg.json` is
/// accepted with a warning.
pub const MANIFEST_FILE_NAMES: &[&str] = &["dylan-package.json", "deft-package.json"];
pub const LEGACY_MANIFEST_FILE_NAME: &str = "pkg.json";

/// `dylan-package.json` deserialized as-is. Unknown keys are ignored, which
/// `serde` does by default (no `deny_unknown_fields`).
#[derive(Clone, Debug, Deserialize)]
pub struct PackageManifestSchema {
    pub name: String,
    pub version: String,
    #[serde(default, rename = "dependencies")]
    pub dependencies: Vec<String>,
    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: Vec<String>,
    /// Source-descriptor keys, consulted only by the fetcher.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

/// `workspace.json` deserialized as-is. `{}` is valid.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorkspaceManifestSchema {
    #[serde(default, rename = "default-library")]
    pub default_library: Option<String>,
}
