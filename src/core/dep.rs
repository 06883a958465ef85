//! `Dep`: a (package-name, version-or-branch) constraint.

use std::fmt;
use std::str::FromStr;

use deft_util_schemas::validate_package_name;

use super::version::{self, Version};
use crate::util::error::DeftError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepParseError {
    #[error("{0}")]
    Name(#[from] deft_util_schemas::NameError),
    #[error("dep string `{0}` has an empty version after `@`")]
    EmptyVersion(String),
    #[error("{0}")]
    Version(#[from] version::VersionParseError),
}

impl From<DepParseError> for DeftError {
    fn from(e: DepParseError) -> Self {
        DeftError::package(e)
    }
}

/// A dependency constraint: a minimum acceptable numeric release, or an
/// exact branch, named against a package name.
///
/// Equality and hashing are defined over `(name, version)` only. Whether the
/// version was written explicitly in the source string is tracked
/// separately, purely so the canonical string form can be reconstructed:
/// a bare `name` round-trips to `name`, not `name@0.0.0`.
#[derive(Debug, Clone)]
pub struct Dep {
    name: String,
    version: Version,
    explicit: bool,
}

impl Dep {
    /// Constructs a Dep directly from a name and version, as if the
    /// version had been written explicitly (`name@version`).
    pub fn new(name: impl Into<String>, version: Version) -> Result<Dep, DepParseError> {
        let name = name.into();
        validate_package_name(&name)?;
        Ok(Dep {
            name,
            version,
            explicit: true,
        })
    }

    /// Constructs a bare-name Dep (no version constraint written), which
    /// resolves against the minimum possible release, version `0.0.0`.
    pub fn unconstrained(name: impl Into<String>) -> Result<Dep, DepParseError> {
        let name = name.into();
        validate_package_name(&name)?;
        Ok(Dep {
            name,
            version: Version::numeric(0, 0, 0),
            explicit: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl PartialEq for Dep {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Eq for Dep {}

impl std::hash::Hash for Dep {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explicit {
            write!(f, "{}@{}", self.name, self.version)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// `parse-dep("name@ver")`: tokenizes on the first `@`; an
/// empty right-hand side fails. No `@` at all parses as an unconstrained
/// dep on `name`.
impl FromStr for Dep {
    type Err = DepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            None => Dep::unconstrained(s),
            Some((_name, "")) => Err(DepParseError::EmptyVersion(s.to_string())),
            Some((name, ver)) => {
                validate_package_name(name)?;
                let version: Version = ver.parse()?;
                Ok(Dep {
                    name: name.to_string(),
                    version,
                    explicit: true,
                })
            }
        }
    }
}
