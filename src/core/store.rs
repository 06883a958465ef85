//! The release store: a content-addressed (by name + version, not hash)
//! directory of installed release source trees.
//!
//! Layout: `<root>/<name>/<version-string>/src/`. `install` is idempotent
//! and safe under concurrent callers: the only commit point is a single
//! atomic rename, via `deft_util::atomic_install`.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::fetch::SourceFetcher;
use super::release::Release;
use crate::util::error::DeftError;

pub struct Store {
    root: PathBuf,
}

impl Store {
    /// `root` is the `_packages` directory itself (callers resolve
    /// `packages-root` defaulting/global-flag logic before constructing a
    /// `Store`).
    pub fn new(root: impl Into<PathBuf>) -> Store {
        Store { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, release: &Release) -> PathBuf {
        self.root.join(release.name())
    }

    /// The directory a release's source tree lives in once installed.
    pub fn source_dir(&self, release: &Release) -> PathBuf {
        self.package_dir(release).join(release.version_string()).join("src")
    }

    /// Ensures `release`'s source tree is present, fetching it via
    /// `fetcher` if necessary. A no-op if the target directory is already
    /// non-empty.
    pub fn install(&self, release: &Release, fetcher: &dyn SourceFetcher) -> Result<PathBuf, DeftError> {
        let dest = self.source_dir(release);
        let parent = self.package_dir(release);
        let prefix = format!("{}-", release.version_string());
        let source = release.source().clone();

        debug!(name = release.name(), version = %release.version(), dest = %dest.display(), "installing release");

        deft_util::atomic_install(&parent, &prefix, &dest, move |tmp| {
            fetcher
                .fetch(&source, tmp)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        })
        .map_err(|e| DeftError::install(release.name(), release.version_string(), anyhow::Error::new(e)))?;

        info!(name = release.name(), version = %release.version(), "release installed");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::release::SourceDescriptor;
    use std::collections::HashSet;

    struct MarkerFetcher;
    impl SourceFetcher for MarkerFetcher {
        fn fetch(&self, _source: &SourceDescriptor, dest: &Path) -> anyhow::Result<()> {
            std::fs::create_dir_all(dest)?;
            std::fs::write(dest.join("marker"), b"ok")?;
            Ok(())
        }
    }

    fn release(name: &str, version: &str) -> Release {
        Release::new(
            name,
            version.parse().unwrap(),
            HashSet::new(),
            HashSet::new(),
            SourceDescriptor::Archive {
                url: format!("https://example.com/{name}.tar.gz"),
            },
        )
    }

    #[test]
    fn install_populates_source_dir() {
        let root = tempfile::tempdir().unwrap();
        let store = Store::new(root.path());
        let release = release("foo", "1.0.0");
        let dest = store.install(&release, &MarkerFetcher).unwrap();
        assert!(dest.join("marker").exists());
        assert_eq!(dest, store.source_dir(&release));
    }

    #[test]
    fn install_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let store = Store::new(root.path());
        let release = release("foo", "1.0.0");
        store.install(&release, &MarkerFetcher).unwrap();

        struct FailingFetcher;
        impl SourceFetcher for FailingFetcher {
            fn fetch(&self, _source: &SourceDescriptor, _dest: &Path) -> anyhow::Result<()> {
                panic!("fetch should not be called on an already-installed release");
            }
        }
        store.install(&release, &FailingFetcher).unwrap();
    }
}
