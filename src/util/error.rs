//! The error taxonomy callers match on to tell apart a bad name/version
//! string, an unsatisfiable dependency, an install failure, and a broken
//! workspace.
//!
//! Internal plumbing (filesystem, fetch) still reaches for `anyhow`,
//! similar to how `CargoResult` works; it only gets wrapped into a typed
//! `DeftError` variant at the boundary where callers need to match on a
//! specific kind.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type DeftResult<T> = Result<T, DeftError>;

/// The chain of package names forming a cycle, rendered `a -> b -> a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath(pub Vec<String>);

impl fmt::Display for CyclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" -> "))
    }
}

/// Why a dependency failed to resolve.
#[derive(Debug, Error)]
pub enum DepErrorKind {
    #[error("no release of `{name}` satisfies `{name}@{requirement}`")]
    NoCandidate { name: String, requirement: String },
    #[error("package `{0}` is not present in the catalog")]
    MissingCatalogEntry(String),
    #[error("dependency cycle detected: {0}")]
    Cycle(CyclePath),
}

/// The top-level error taxonomy.
#[derive(Debug, Error)]
pub enum DeftError {
    /// Malformed name, version, or dep string.
    #[error("{0}")]
    Package(String),

    /// Missing catalog entry, no compatible candidate, or a prod-dep cycle
    ///.
    #[error(transparent)]
    Dep(#[from] DepErrorKind),

    /// Incompatible majors, or incompatible branch identifiers, required
    /// simultaneously.
    #[error("conflicting requirements for `{name}`: `{a}` vs `{b}`")]
    DepConflict { name: String, a: String, b: String },

    /// Fetch or filesystem failure during store population.
    #[error("failed to install `{name}@{version}`")]
    Install {
        name: String,
        version: String,
        #[source]
        source: anyhow::Error,
    },

    /// Missing workspace, invalid manifest JSON, or structural
    /// contradictions.
    #[error("{message}")]
    Workspace {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl DeftError {
    pub fn package(msg: impl fmt::Display) -> Self {
        DeftError::Package(msg.to_string())
    }

    pub fn workspace(msg: impl fmt::Display) -> Self {
        DeftError::Workspace {
            message: msg.to_string(),
            source: None,
        }
    }

    pub fn workspace_with_source(msg: impl fmt::Display, source: anyhow::Error) -> Self {
        DeftError::Workspace {
            message: msg.to_string(),
            source: Some(source),
        }
    }

    pub fn install(name: impl Into<String>, version: impl Into<String>, source: anyhow::Error) -> Self {
        DeftError::Install {
            name: name.into(),
            version: version.into(),
            source,
        }
    }

    pub fn dep_conflict(name: impl Into<String>, a: impl fmt::Display, b: impl fmt::Display) -> Self {
        DeftError::DepConflict {
            name: name.into(),
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    pub fn cycle(path: Vec<String>) -> Self {
        DeftError::Dep(DepErrorKind::Cycle(CyclePath(path)))
    }

    pub fn no_candidate(name: impl Into<String>, requirement: impl fmt::Display) -> Self {
        DeftError::Dep(DepErrorKind::NoCandidate {
            name: name.into(),
            requirement: requirement.to_string(),
        })
    }

    pub fn missing_catalog_entry(name: impl Into<String>) -> Self {
        DeftError::Dep(DepErrorKind::MissingCatalogEntry(name.into()))
    }
}

/// A manifest or workspace file that could not be located, with the path
/// that was checked, to make `workspace-error` messages concrete.
pub fn workspace_not_found(start: &std::path::Path) -> DeftError {
    DeftError::workspace(format!(
        "no `workspace.json` or package manifest found in `{}` or any ancestor directory",
        start.display()
    ))
}

pub fn nested_workspace(inner: &PathBuf, outer: &PathBuf) -> DeftError {
    DeftError::workspace(format!(
        "workspace at `{}` is nested inside workspace at `{}`",
        inner.display(),
        outer.display()
    ))
}
