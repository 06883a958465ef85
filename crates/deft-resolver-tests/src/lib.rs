//! Shared fixtures for the end-to-end resolver/`update` scenario tests in
//! `tests/`, mirroring the split in the teacher's own `resolver-tests`
//! crate: a small `src/lib.rs` of fixtures (`pkg!`/`registry()` there,
//! `pkg`/`StubFetcher` here) that `tests/*.rs` import as an external crate,
//! keeping the actual `#[test]` functions out of the library build.

use std::path::Path;

use deft::{Release, SourceDescriptor, SourceFetcher};

/// Builds a `Release` with archive-sourced deps, named `https://example.com/<name>.tar.gz`,
/// for tests that only care about the resolver's view of a release.
pub fn pkg(name: &str, version: &str, prod: &[&str], dev: &[&str]) -> Release {
    let prod_deps = prod.iter().map(|d| d.parse().unwrap()).collect();
    let dev_deps = dev.iter().map(|d| d.parse().unwrap()).collect();
    Release::new(
        name,
        version.parse().unwrap(),
        prod_deps,
        dev_deps,
        SourceDescriptor::Archive {
            url: format!("https://example.com/{name}.tar.gz"),
        },
    )
}

/// A fetcher that writes a single `.lid` file named after the release, so
/// the registry generator has something to find once the release is
/// installed.
pub struct StubFetcher;

impl SourceFetcher for StubFetcher {
    fn fetch(&self, source: &SourceDescriptor, dest: &Path) -> anyhow::Result<()> {
        let SourceDescriptor::Archive { url } = source else {
            anyhow::bail!("StubFetcher only handles archive sources");
        };
        let name = url
            .rsplit('/')
            .next()
            .and_then(|s| s.strip_suffix(".tar.gz"))
            .unwrap_or("unknown");
        std::fs::create_dir_all(dest)?;
        std::fs::write(
            dest.join(format!("{name}.lid")),
            format!("Library: {name}\n"),
        )?;
        Ok(())
    }
}
