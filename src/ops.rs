//! `update`: the single entry point tying the resolver, store, and registry
//! generator together in strict phase order (resolve → install-all →
//! write-registry).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::catalog::Catalog;
use crate::core::fetch::SourceFetcher;
use crate::core::registry;
use crate::core::release::Release;
use crate::core::resolver;
use crate::core::store::Store;
use crate::core::workspace::Workspace;
use crate::util::error::DeftError;

/// The settings `update` needs from its caller. Everything beyond this —
/// config-file loading, CLI argument parsing — is the caller's concern.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Overrides the packages root entirely; takes priority over `global`.
    pub packages_root: Option<PathBuf>,
    /// When set (and `packages_root` is unset), installs go to a per-user
    /// location under the home directory instead of `<workspace>/_packages`.
    pub global: bool,
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub resolved: HashSet<Release>,
    pub warnings: Vec<String>,
    pub registry_files_written: usize,
    pub missing_lids: Vec<String>,
}

pub fn update(
    start: &Path,
    catalog: &dyn Catalog,
    fetcher: &dyn SourceFetcher,
    options: &UpdateOptions,
) -> Result<UpdateReport, DeftError> {
    let workspace = Workspace::discover(start)?;
    info!(workspace = %workspace.directory().display(), "resolving dependencies");

    let outcome = resolver::resolve(catalog, workspace.active_packages())?;

    let store = Store::new(packages_root(&workspace, options)?);
    for release in &outcome.releases {
        if workspace.active_packages().contains_key(release.name()) {
            continue;
        }
        store.install(release, fetcher)?;
    }

    let generated = registry::generate(&workspace, &outcome.releases, &store)?;
    info!(
        files_written = generated.files_written,
        missing = generated.missing.len(),
        "registry updated"
    );

    Ok(UpdateReport {
        resolved: outcome.releases,
        warnings: outcome.warnings,
        registry_files_written: generated.files_written,
        missing_lids: generated.missing,
    })
}

fn packages_root(workspace: &Workspace, options: &UpdateOptions) -> Result<PathBuf, DeftError> {
    if let Some(root) = &options.packages_root {
        return Ok(root.clone());
    }
    if options.global {
        let home_dir = home::home_dir()
            .ok_or_else(|| DeftError::workspace("could not determine a home directory for the global packages root"))?;
        return Ok(home_dir.join(".deft").join("_packages"));
    }
    Ok(workspace.directory().join("_packages"))
}
