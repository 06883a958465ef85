//! `Release`: an immutable (package, version) pair with its
//! declared dependencies and a source descriptor.

use std::collections::HashSet;

use super::dep::Dep;
use super::version::Version;

/// Where a release's source tree comes from: either a
/// version-control checkout at a tag/branch, or a URL-addressed archive.
/// A manifest's `branch` key selects version control (cloning that
/// branch, or the release's own branch identifier when the release itself
/// is a branch version); its absence with only a `url` selects an archive —
/// see DESIGN.md for why this split was chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceDescriptor {
    VersionControl { url: String, revision: String },
    Archive { url: String },
}

/// An immutable (name, version) release with its declared dependencies.
/// Identity is `(name, version)`; two `Release`s with the same
/// identity but different dep sets are never expected to coexist in a
/// well-formed catalog, but identity equality is intentionally only
/// `(name, version)` so that active-package shadowing can
/// compare a local `Release` against a catalog one by identity.
#[derive(Clone, Debug)]
pub struct Release {
    name: String,
    version: Version,
    prod_deps: HashSet<Dep>,
    dev_deps: HashSet<Dep>,
    source: SourceDescriptor,
}

impl Release {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        prod_deps: HashSet<Dep>,
        dev_deps: HashSet<Dep>,
        source: SourceDescriptor,
    ) -> Release {
        Release {
            name: name.into(),
            version,
            prod_deps,
            dev_deps,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn prod_deps(&self) -> &HashSet<Dep> {
        &self.prod_deps
    }

    pub fn dev_deps(&self) -> &HashSet<Dep> {
        &self.dev_deps
    }

    pub fn source(&self) -> &SourceDescriptor {
        &self.source
    }

    /// The canonical on-disk version string used for the store path
    ///: `M.N.P` or the branch identifier.
    pub fn version_string(&self) -> String {
        self.version.to_string()
    }
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Eq for Release {}

impl std::hash::Hash for Release {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
    }
}
