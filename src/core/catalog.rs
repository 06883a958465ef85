//! Catalog interface: the registry of packages and releases
//! the resolver consults.

use std::collections::HashMap;

use tracing::debug;

use super::dep::Dep;
use super::release::Release;
use super::version::{compatible, Version};
use crate::util::error::DeftError;

/// Sort key giving releases of one package a deterministic ascending
/// order even though `Version` is only a partial order: numeric releases
/// sort by `(major, minor, patch)` before any branch release, which sorts
/// by identifier.
fn version_sort_key(v: &Version) -> (u8, u64, u64, u64, &str) {
    match v {
        Version::Numeric(n) => (0, n.major, n.minor, n.patch, ""),
        Version::Branch(b) => (1, 0, 0, 0, b.as_str()),
    }
}

/// Lookup by package name, as required by the resolver.
pub trait Catalog {
    /// All releases of `name`, ascending by version. Empty if `name` is
    /// unknown to the catalog.
    fn releases(&self, name: &str) -> Vec<&Release>;

    /// The release of `name` at exactly `version`, if any.
    fn release(&self, name: &str, version: &Version) -> Option<&Release>;

    /// Checks the catalog-level invariant: every
    /// prod-dep of every release names a package present in the catalog
    /// with at least one release whose version is `>=` the constraint and
    /// whose major matches. Dev-deps are exempt.
    fn validate(&self) -> Result<(), DeftError>;
}

/// A simple catalog backed by an in-memory map, for embedding a real
/// catalog loaded elsewhere or for tests.
#[derive(Default)]
pub struct InMemoryCatalog {
    releases: HashMap<String, Vec<Release>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, release: Release) -> &mut Self {
        self.releases
            .entry(release.name().to_string())
            .or_default()
            .push(release);
        self
    }

    fn satisfies(&self, dep: &Dep) -> bool {
        self.releases(dep.name())
            .into_iter()
            .any(|r| compatible(r.version(), dep.version()) && r.version() >= dep.version())
    }
}

impl Catalog for InMemoryCatalog {
    fn releases(&self, name: &str) -> Vec<&Release> {
        let mut out: Vec<&Release> = self
            .releases
            .get(name)
            .map(|v| v.iter().collect())
            .unwrap_or_default();
        out.sort_by(|a, b| version_sort_key(a.version()).partial_cmp(&version_sort_key(b.version())).unwrap());
        out
    }

    fn release(&self, name: &str, version: &Version) -> Option<&Release> {
        self.releases.get(name)?.iter().find(|r| r.version() == version)
    }

    fn validate(&self) -> Result<(), DeftError> {
        for releases in self.releases.values() {
            for release in releases {
                for dep in release.prod_deps() {
                    if !self.satisfies(dep) {
                        debug!(
                            release = %release.name(),
                            release_version = %release.version(),
                            dep = %dep,
                            "catalog invariant violated"
                        );
                        return Err(DeftError::workspace(format!(
                            "catalog invariant violated: `{}@{}` depends on `{}`, \
                             but no release of `{}` satisfies it",
                            release.name(),
                            release.version(),
                            dep,
                            dep.name(),
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::release::SourceDescriptor;
    use std::collections::HashSet;

    fn release(name: &str, version: &str, prod_deps: &[&str]) -> Release {
        let deps: HashSet<Dep> = prod_deps.iter().map(|d| d.parse().unwrap()).collect();
        Release::new(
            name,
            version.parse().unwrap(),
            deps,
            HashSet::new(),
            SourceDescriptor::Archive {
                url: format!("https://example.com/{name}.tar.gz"),
            },
        )
    }

    #[test]
    fn releases_are_ascending() {
        let mut cat = InMemoryCatalog::new();
        cat.insert(release("foo", "1.0.2", &[]));
        cat.insert(release("foo", "1.0.0", &[]));
        cat.insert(release("foo", "1.1.0", &[]));
        let versions: Vec<String> = cat.releases("foo").iter().map(|r| r.version().to_string()).collect();
        assert_eq!(versions, vec!["1.0.0", "1.0.2", "1.1.0"]);
    }

    #[test]
    fn validate_passes_for_well_formed_catalog() {
        let mut cat = InMemoryCatalog::new();
        cat.insert(release("a", "1.0.0", &["b@1.0"]));
        cat.insert(release("b", "1.0.0", &[]));
        assert!(cat.validate().is_ok());
    }

    #[test]
    fn validate_fails_on_missing_dependency() {
        let mut cat = InMemoryCatalog::new();
        cat.insert(release("a", "1.0.0", &["b@1.0"]));
        assert!(cat.validate().is_err());
    }

    #[test]
    fn validate_fails_on_major_mismatch() {
        let mut cat = InMemoryCatalog::new();
        cat.insert(release("a", "1.0.0", &["b@2.0"]));
        cat.insert(release("b", "1.0.0", &[]));
        assert!(cat.validate().is_err());
    }

    #[test]
    fn validate_ignores_dev_deps() {
        let mut cat = InMemoryCatalog::new();
        let deps: HashSet<Dep> = ["b@1.0".parse().unwrap()].into_iter().collect();
        cat.insert(Release::new(
            "a",
            "1.0.0".parse().unwrap(),
            HashSet::new(),
            deps,
            SourceDescriptor::Archive {
                url: "https://example.com/a.tar.gz".into(),
            },
        ));
        assert!(cat.validate().is_ok());
    }
}
