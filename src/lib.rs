//! Deft's core library: dependency resolution, release installation, and
//! registry generation. The `deft` binary (and anything else embedding
//! this crate) drives these through [`ops::update`].

pub mod core;
pub mod ops;
mod util;

pub use core::catalog::{Catalog, InMemoryCatalog};
pub use core::dep::{Dep, DepParseError};
pub use core::fetch::{ArchiveFetcher, DefaultFetcher, GitFetcher, SourceFetcher};
pub use core::registry::{self, GeneratedRegistry, Lid, LidParseError};
pub use core::release::{Release, SourceDescriptor};
pub use core::resolver::{resolve, ResolveOutcome};
pub use core::store::Store;
pub use core::version::{compatible, max, Version, VersionConflict, VersionParseError};
pub use core::workspace::Workspace;
pub use ops::{update, UpdateOptions, UpdateReport};
pub use util::error::{DeftError, DeftResult};
pub use util::logging;
