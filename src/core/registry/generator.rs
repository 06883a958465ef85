//! Scans active and installed package directories for `.lid` files and
//! writes the registry: one small pointer file per (library, platform),
//! written only when its contents actually change.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use deft_platform::Platform;
use tracing::debug;
use walkdir::WalkDir;

use super::lid::{self, Lid};
use crate::core::release::Release;
use crate::core::store::Store;
use crate::core::workspace::Workspace;
use crate::util::error::DeftError;

#[derive(Debug, Default)]
pub struct GeneratedRegistry {
    /// Number of registry files actually written this run (absent→current
    /// or stale→current transitions; zero on a fully up-to-date run).
    pub files_written: usize,
    /// Package names that contributed no eligible `.lid` file at all.
    pub missing: Vec<String>,
}

/// Generates the registry for `workspace` from the resolved `releases` (the
/// non-active ones are read from `store`; active ones from their own
/// directories).
pub fn generate(
    workspace: &Workspace,
    releases: &HashSet<Release>,
    store: &Store,
) -> Result<GeneratedRegistry, DeftError> {
    let mut package_dirs: Vec<(String, PathBuf)> = Vec::new();

    for (name, _release) in workspace.active_packages() {
        if let Some(dir) = workspace.active_package_directory(name) {
            package_dirs.push((name.clone(), dir.to_path_buf()));
        }
    }
    for release in releases {
        if workspace.active_packages().contains_key(release.name()) {
            continue;
        }
        package_dirs.push((release.name().to_string(), store.source_dir(release)));
    }

    let registry_dir = workspace.registry_directory();
    let mut files_written = 0;
    let mut missing = Vec::new();

    for (package_name, package_dir) in &package_dirs {
        let lids = scan_package(package_dir)?;
        if lids.is_empty() {
            missing.push(package_name.clone());
            continue;
        }

        let included: HashSet<PathBuf> = lids
            .iter()
            .flat_map(|(_, lid)| lid.includes.iter().map(|inc| package_dir.join(inc)))
            .collect();

        for (path, lid) in &lids {
            if included.contains(path) {
                continue;
            }
            let platforms: Vec<Platform> = if lid.platforms.is_empty() {
                vec![Platform::Generic]
            } else {
                lid.platforms.clone()
            };
            let relative = path.strip_prefix(workspace.directory()).unwrap_or(path);
            let pointer = format!("abstract://{}\n", relative.display());

            for platform in &platforms {
                let entry_path = registry_dir.join(platform.directory()).join(&lid.library);
                let wrote = deft_util::write_if_different(&entry_path, &pointer).map_err(|e| {
                    DeftError::workspace_with_source(
                        format!("writing registry entry `{}`", entry_path.display()),
                        e.into(),
                    )
                })?;
                if wrote {
                    debug!(entry = %entry_path.display(), "wrote registry entry");
                    files_written += 1;
                }
            }
        }
    }

    Ok(GeneratedRegistry { files_written, missing })
}

fn scan_package(dir: &Path) -> Result<Vec<(PathBuf, Lid)>, DeftError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("lid") {
            continue;
        }
        let contents = std::fs::read_to_string(entry.path()).map_err(|e| {
            DeftError::workspace_with_source(format!("reading `{}`", entry.path().display()), e.into())
        })?;
        let parsed = lid::parse(&contents).map_err(|e| {
            DeftError::workspace(format!("`{}`: {e}", entry.path().display()))
        })?;
        found.push((entry.path().to_path_buf(), parsed));
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::release::SourceDescriptor;
    use crate::core::version::Version;
    use deft_test_support::{write_lid, ProjectBuilder};
    use std::collections::HashSet as StdHashSet;

    fn release(name: &str, version: &str) -> Release {
        Release::new(
            name,
            version.parse::<Version>().unwrap(),
            StdHashSet::new(),
            StdHashSet::new(),
            SourceDescriptor::Archive { url: String::new() },
        )
    }

    #[test]
    fn writes_one_entry_per_platform() {
        let project = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &[], &[])
            .build();
        write_lid(project.path(), "widgets.lid", "Library: widgets\nPlatforms: linux macos\n");

        let workspace = Workspace::discover(project.path()).unwrap();
        let store = Store::new(project.path().join("_packages"));
        let releases = HashSet::new();

        let report = generate(&workspace, &releases, &store).unwrap();
        assert_eq!(report.files_written, 2);
        assert!(workspace.registry_directory().join("linux/widgets").exists());
        assert!(workspace.registry_directory().join("macos/widgets").exists());
    }

    #[test]
    fn second_run_writes_nothing() {
        let project = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &[], &[])
            .build();
        write_lid(project.path(), "widgets.lid", "Library: widgets\n");

        let workspace = Workspace::discover(project.path()).unwrap();
        let store = Store::new(project.path().join("_packages"));
        let releases = HashSet::new();

        let first = generate(&workspace, &releases, &store).unwrap();
        assert_eq!(first.files_written, 1);
        let second = generate(&workspace, &releases, &store).unwrap();
        assert_eq!(second.files_written, 0);
    }

    #[test]
    fn no_platforms_header_uses_generic() {
        let project = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &[], &[])
            .build();
        write_lid(project.path(), "widgets.lid", "Library: widgets\n");

        let workspace = Workspace::discover(project.path()).unwrap();
        let store = Store::new(project.path().join("_packages"));
        let releases = HashSet::new();

        generate(&workspace, &releases, &store).unwrap();
        assert!(workspace.registry_directory().join("generic/widgets").exists());
    }

    #[test]
    fn included_fragment_produces_no_entry_of_its_own() {
        let project = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &[], &[])
            .build();
        write_lid(project.path(), "widgets.lid", "Library: widgets\nLID: shared.lid\n");
        write_lid(project.path(), "shared.lid", "Library: shared-fragment\n");

        let workspace = Workspace::discover(project.path()).unwrap();
        let store = Store::new(project.path().join("_packages"));
        let releases = HashSet::new();

        let report = generate(&workspace, &releases, &store).unwrap();
        assert_eq!(report.files_written, 1);
        assert!(workspace.registry_directory().join("generic/widgets").exists());
        assert!(!workspace.registry_directory().join("generic/shared-fragment").exists());
    }

    #[test]
    fn installed_non_active_release_is_scanned_too() {
        let project = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &[], &[])
            .build();

        let workspace = Workspace::discover(project.path()).unwrap();
        let store = Store::new(project.path().join("_packages"));
        let dep = release("bar", "1.0.0");
        let src_dir = store.source_dir(&dep);
        std::fs::create_dir_all(&src_dir).unwrap();
        write_lid(&src_dir, "bar.lid", "Library: bar\n");

        let mut releases = HashSet::new();
        releases.insert(dep);

        let report = generate(&workspace, &releases, &store).unwrap();
        assert_eq!(report.files_written, 1);
        assert!(workspace.registry_directory().join("generic/bar").exists());
    }

    #[test]
    fn package_without_any_lid_is_reported_missing() {
        let project = ProjectBuilder::new()
            .package_manifest(".", "foo", "1.0.0", &[], &[])
            .build();

        let workspace = Workspace::discover(project.path()).unwrap();
        let store = Store::new(project.path().join("_packages"));
        let releases = HashSet::new();

        let report = generate(&workspace, &releases, &store).unwrap();
        assert_eq!(report.files_written, 0);
        assert_eq!(report.missing, vec!["foo".to_string()]);
    }
}
