//! Source fetchers: populate a release's target directory from its
//! `SourceDescriptor`, either by cloning a version-control repository at a
//! tag/branch or by extracting a URL-addressed archive.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

use super::release::SourceDescriptor;

/// Populates `dest` from `source`, fully or not at all. Implementations
/// must leave `dest` absent or empty on failure; `deft::core::store`'s
/// atomic rename is what makes a half-populated `dest` safe to discard.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, source: &SourceDescriptor, dest: &Path) -> anyhow::Result<()>;
}

/// Clones a version-control repository and checks out the release's
/// revision (a tag or branch name).
pub struct GitFetcher;

impl SourceFetcher for GitFetcher {
    fn fetch(&self, source: &SourceDescriptor, dest: &Path) -> anyhow::Result<()> {
        let (url, revision) = match source {
            SourceDescriptor::VersionControl { url, revision } => (url, revision),
            SourceDescriptor::Archive { .. } => bail!("GitFetcher cannot fetch an archive source"),
        };
        let repo = git2::Repository::clone(url, dest)
            .with_context(|| format!("cloning `{url}`"))?;
        let (object, reference) = repo
            .revparse_ext(revision)
            .with_context(|| format!("resolving revision `{revision}` in `{url}`"))?;
        repo.checkout_tree(&object, None)
            .with_context(|| format!("checking out `{revision}`"))?;
        match reference {
            Some(r) => repo.set_head(r.name().ok_or_else(|| anyhow::anyhow!("unnamed reference"))?)?,
            None => repo.set_head_detached(object.id())?,
        }
        Ok(())
    }
}

/// Extracts a `.tar.gz` archive addressed by a `file://` or bare filesystem
/// path URL. Deft's catalogs are not expected to serve archives over the
/// network; the HTTP case is an external collaborator.
pub struct ArchiveFetcher;

impl SourceFetcher for ArchiveFetcher {
    fn fetch(&self, source: &SourceDescriptor, dest: &Path) -> anyhow::Result<()> {
        let url = match source {
            SourceDescriptor::Archive { url } => url,
            SourceDescriptor::VersionControl { .. } => {
                bail!("ArchiveFetcher cannot fetch a version-control source")
            }
        };
        let path = url.strip_prefix("file://").unwrap_or(url);
        let file = fs::File::open(path).with_context(|| format!("opening archive `{path}`"))?;
        let gz = flate2::read::GzDecoder::new(file);
        let mut archive = tar::Archive::new(gz);
        archive
            .unpack(dest)
            .with_context(|| format!("extracting archive `{path}`"))?;
        Ok(())
    }
}

/// The production fetcher: dispatches to `GitFetcher` or `ArchiveFetcher`
/// depending on which kind of source the release carries.
#[derive(Default)]
pub struct DefaultFetcher;

impl SourceFetcher for DefaultFetcher {
    fn fetch(&self, source: &SourceDescriptor, dest: &Path) -> anyhow::Result<()> {
        match source {
            SourceDescriptor::VersionControl { .. } => GitFetcher.fetch(source, dest),
            SourceDescriptor::Archive { .. } => ArchiveFetcher.fetch(source, dest),
        }
    }
}
