//! Workspace discovery and the active-package set (the `Release`s whose
//! source lives in the workspace, taken from their local manifest rather
//! than the catalog).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use deft_util_schemas::manifest::{
    PackageManifestSchema, WorkspaceManifestSchema, LEGACY_MANIFEST_FILE_NAME, MANIFEST_FILE_NAMES,
};
use tracing::warn;

use super::dep::Dep;
use super::release::{Release, SourceDescriptor};
use super::version::Version;
use crate::util::error::{nested_workspace, workspace_not_found, DeftError};

pub struct Workspace {
    root: PathBuf,
    default_library: Option<String>,
    active: HashMap<String, Release>,
    active_dirs: HashMap<String, PathBuf>,
    active_files: HashMap<String, PathBuf>,
}

impl Workspace {
    pub fn directory(&self) -> &Path {
        &self.root
    }

    pub fn registry_directory(&self) -> PathBuf {
        self.root.join("registry")
    }

    pub fn default_library(&self) -> Option<&str> {
        self.default_library.as_deref()
    }

    pub fn active_packages(&self) -> &HashMap<String, Release> {
        &self.active
    }

    pub fn active_package_directory(&self, name: &str) -> Option<&Path> {
        self.active_dirs.get(name).map(PathBuf::as_path)
    }

    pub fn active_package_file(&self, name: &str) -> Option<&Path> {
        self.active_files.get(name).map(PathBuf::as_path)
    }

    /// Walks from `start` toward the filesystem root. The nearest ancestor
    /// containing `workspace.json` wins and is loaded as a (possibly
    /// multi-package) workspace; failing that, the nearest ancestor
    /// containing a package manifest wins and is loaded as a single-package
    /// workspace. Fails if neither is found before the filesystem root.
    ///
    /// Also fails if a *second*, more distant ancestor also contains a
    /// `workspace.json`: a workspace nested inside another workspace is
    /// the structural contradiction named in §7, since there would be no
    /// way to tell which one the caller meant.
    pub fn discover(start: &Path) -> Result<Workspace, DeftError> {
        let start = std::fs::canonicalize(start)
            .map_err(|e| DeftError::workspace_with_source(format!("cannot resolve `{}`", start.display()), e.into()))?;

        for dir in start.ancestors() {
            if dir.join("workspace.json").is_file() {
                if let Some(outer) = find_outer_workspace(dir) {
                    return Err(nested_workspace(&dir.to_path_buf(), &outer));
                }
                return Self::load_multi_package(dir);
            }
        }
        for dir in start.ancestors() {
            if let Some(manifest_path) = find_manifest_file(dir) {
                return Self::load_single_package(dir, &manifest_path);
            }
        }
        Err(workspace_not_found(&start))
    }

    fn load_single_package(root: &Path, manifest_path: &Path) -> Result<Workspace, DeftError> {
        let schema = read_manifest(manifest_path)?;
        let release = release_from_schema(&schema)?;
        let name = release.name().to_string();

        let mut active = HashMap::new();
        let mut active_dirs = HashMap::new();
        let mut active_files = HashMap::new();
        active_dirs.insert(name.clone(), root.to_path_buf());
        active_files.insert(name.clone(), manifest_path.to_path_buf());
        active.insert(name, release);

        Ok(Workspace {
            root: root.to_path_buf(),
            default_library: None,
            active,
            active_dirs,
            active_files,
        })
    }

    fn load_multi_package(root: &Path) -> Result<Workspace, DeftError> {
        let workspace_schema = read_workspace_manifest(&root.join("workspace.json"))?;

        if let Some(manifest_path) = find_manifest_file(root) {
            warn!(
                workspace = %root.display(),
                "both workspace.json and a root package manifest are present; \
                 subdirectory packages are ignored"
            );
            return Self::load_single_package(root, &manifest_path).map(|mut ws| {
                ws.default_library = workspace_schema.default_library;
                ws
            });
        }

        let mut active = HashMap::new();
        let mut active_dirs = HashMap::new();
        let mut active_files = HashMap::new();

        let mut entries: Vec<PathBuf> = std::fs::read_dir(root)
            .map_err(|e| DeftError::workspace_with_source(format!("reading `{}`", root.display()), e.into()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        entries.sort();

        for dir in entries {
            let Some(manifest_path) = find_manifest_file(&dir) else {
                continue;
            };
            let schema = read_manifest(&manifest_path)?;
            let release = release_from_schema(&schema)?;
            let name = release.name().to_string();
            active_dirs.insert(name.clone(), dir);
            active_files.insert(name.clone(), manifest_path);
            active.insert(name, release);
        }

        Ok(Workspace {
            root: root.to_path_buf(),
            default_library: workspace_schema.default_library,
            active,
            active_dirs,
            active_files,
        })
    }
}

/// Looks for a second `workspace.json` in some ancestor of `dir` strictly
/// above it, for `discover`'s nested-workspace check.
fn find_outer_workspace(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .skip(1)
        .find(|ancestor| ancestor.join("workspace.json").is_file())
        .map(Path::to_path_buf)
}

fn find_manifest_file(dir: &Path) -> Option<PathBuf> {
    for name in MANIFEST_FILE_NAMES {
        let path = dir.join(name);
        if path.is_file() {
            return Some(path);
        }
    }
    let legacy = dir.join(LEGACY_MANIFEST_FILE_NAME);
    if legacy.is_file() {
        warn!(path = %legacy.display(), "`pkg.json` is a legacy manifest name; rename to `dylan-package.json`");
        return Some(legacy);
    }
    None
}

fn read_manifest(path: &Path) -> Result<PackageManifestSchema, DeftError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| DeftError::workspace_with_source(format!("reading `{}`", path.display()), e.into()))?;
    serde_json::from_str(&contents)
        .map_err(|e| DeftError::workspace_with_source(format!("parsing `{}`", path.display()), e.into()))
}

fn read_workspace_manifest(path: &Path) -> Result<WorkspaceManifestSchema, DeftError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| DeftError::workspace_with_source(format!("reading `{}`", path.display()), e.into()))?;
    serde_json::from_str(&contents)
        .map_err(|e| DeftError::workspace_with_source(format!("parsing `{}`", path.display()), e.into()))
}

/// Builds the active package's `Release` from its manifest, deciding its
/// source descriptor from the `url`/`branch` keys. Active packages are
/// never fetched through the store (shadowing means they are always read
/// from their own directory), so a manifest with neither key gets an empty
/// archive descriptor as a harmless placeholder.
fn release_from_schema(schema: &PackageManifestSchema) -> Result<Release, DeftError> {
    let version: Version = schema
        .version
        .parse()
        .map_err(|e: super::version::VersionParseError| DeftError::package(e))?;

    let prod_deps: HashSet<Dep> = parse_deps(&schema.dependencies)?;
    let dev_deps: HashSet<Dep> = parse_deps(&schema.dev_dependencies)?;

    let source = match (&schema.branch, &schema.url) {
        (Some(branch), _) => SourceDescriptor::VersionControl {
            url: schema.url.clone().unwrap_or_default(),
            revision: branch.clone(),
        },
        (None, Some(url)) => SourceDescriptor::Archive { url: url.clone() },
        (None, None) => SourceDescriptor::Archive { url: String::new() },
    };

    Ok(Release::new(schema.name.clone(), version, prod_deps, dev_deps, source))
}

fn parse_deps(raw: &[String]) -> Result<HashSet<Dep>, DeftError> {
    raw.iter()
        .map(|s| s.parse::<Dep>().map_err(DeftError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deft_test_support::ProjectBuilder;

    #[test]
    fn single_package_workspace() {
        let root = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &["bar@1.0"], &[])
            .build();
        let ws = Workspace::discover(root.path()).unwrap();
        assert_eq!(ws.active_packages().len(), 1);
        assert!(ws.active_packages().contains_key("foo"));
        assert_eq!(
            ws.active_package_directory("foo").unwrap(),
            std::fs::canonicalize(root.path()).unwrap()
        );
    }

    #[test]
    fn multi_package_workspace() {
        let root = ProjectBuilder::new()
            .workspace_manifest(None)
            .package_manifest("a", "a", "1.0.0", &[], &[])
            .package_manifest("b", "b", "1.0.0", &[], &[])
            .build();
        let ws = Workspace::discover(root.path()).unwrap();
        assert_eq!(ws.active_packages().len(), 2);
        assert!(ws.active_packages().contains_key("a"));
        assert!(ws.active_packages().contains_key("b"));
    }

    #[test]
    fn discovery_walks_up_from_a_subdirectory() {
        let root = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &[], &[])
            .file("src/nested/.keep", "")
            .build();
        let nested = root.path().join("src/nested");
        let ws = Workspace::discover(&nested).unwrap();
        assert!(ws.active_packages().contains_key("foo"));
    }

    #[test]
    fn missing_workspace_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Workspace::discover(dir.path()).is_err());
    }

    #[test]
    fn root_manifest_shadows_subdirectories_with_warning() {
        let root = ProjectBuilder::new()
            .workspace_manifest(None)
            .package_manifest(".", "root-pkg", "1.0.0", &[], &[])
            .package_manifest("a", "a", "1.0.0", &[], &[])
            .build();
        let ws = Workspace::discover(root.path()).unwrap();
        assert_eq!(ws.active_packages().len(), 1);
        assert!(ws.active_packages().contains_key("root-pkg"));
    }

    #[test]
    fn workspace_nested_inside_another_workspace_fails() {
        let root = ProjectBuilder::new()
            .workspace_manifest(None)
            .file("inner/workspace.json", "{}")
            .package_manifest("inner/a", "a", "1.0.0", &[], &[])
            .build();
        let err = Workspace::discover(&root.path().join("inner")).unwrap_err();
        assert!(matches!(err, DeftError::Workspace { .. }));
        assert!(err.to_string().contains("nested inside"));
    }
}
