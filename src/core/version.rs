//! Version & Dep algebra.
//!
//! A `Version` is a tagged union of two disjoint variants: a numeric triple
//! or a bare branch identifier, incomparable to one another except by
//! identity. The numeric component is represented with `semver::Version`
//! (pre-release and build metadata always empty) so ordering comes for free
//! from a crate the rest of the ecosystem already uses for exactly this job.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Two releases that cannot be compared or merged:
/// different majors, or branch identifiers that don't match.
#[derive(Debug, Clone, thiserror::Error)]
#[error("version conflict: `{0}` and `{1}` are not compatible")]
pub struct VersionConflict(pub String, pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("`{0}` is neither a numeric version (M[.N[.P]]) nor a valid branch identifier")]
    Invalid(String),
}

/// A release version: either a numeric `(major, minor, patch)` triple or a
/// branch identifier.
#[derive(Clone, Debug)]
pub enum Version {
    Numeric(semver::Version),
    Branch(String),
}

// Serialized as its canonical string form, not as the structural
// `semver::Version`/`String` union, so that partial numeric forms like
// `"1.2"` round-trip through `FromStr` (which expands them) rather than
// through `semver`'s stricter `M.N.P`-only parser.
impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl Version {
    pub fn numeric(major: u64, minor: u64, patch: u64) -> Version {
        Version::Numeric(semver::Version::new(major, minor, patch))
    }

    pub fn major(&self) -> Option<u64> {
        match self {
            Version::Numeric(v) => Some(v.major),
            Version::Branch(_) => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Version::Branch(_))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Version::Numeric(a), Version::Numeric(b)) => {
                a.major == b.major && a.minor == b.minor && a.patch == b.patch
            }
            (Version::Branch(a), Version::Branch(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Version {}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Version::Numeric(v) => {
                0u8.hash(state);
                v.major.hash(state);
                v.minor.hash(state);
                v.patch.hash(state);
            }
            Version::Branch(b) => {
                1u8.hash(state);
                b.hash(state);
            }
        }
    }
}

/// Numeric versions compare by `(major, minor, patch)`; branch versions
/// only ever compare equal to an identical identifier. This is a partial
/// order: two branch versions with different identifiers, or a numeric and
/// a branch version, have no ordering.
impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Version::Numeric(a), Version::Numeric(b)) => Some(
                a.major
                    .cmp(&b.major)
                    .then(a.minor.cmp(&b.minor))
                    .then(a.patch.cmp(&b.patch)),
            ),
            (Version::Branch(a), Version::Branch(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Numeric(v) => write!(f, "{}.{}.{}", v.major, v.minor, v.patch),
            Version::Branch(b) => f.write_str(b),
        }
    }
}

fn is_numeric_form(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return false;
    }
    parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

impl FromStr for Version {
    type Err = VersionParseError;

    /// `parse-version`: `M`, `M.N`, `M.N.P` with missing
    /// components defaulting to 0; otherwise, if `s` is a non-empty
    /// identifier not beginning with a digit, a branch version.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_numeric_form(s) {
            let mut parts = s
                .split('.')
                .map(|p| p.parse::<u64>().map_err(|_| VersionParseError::Invalid(s.to_string())));
            let major = parts.next().transpose()?.unwrap_or(0);
            let minor = parts.next().transpose()?.unwrap_or(0);
            let patch = parts.next().transpose()?.unwrap_or(0);
            return Ok(Version::numeric(major, minor, patch));
        }
        if !s.is_empty() && !s.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(Version::Branch(s.to_string()));
        }
        Err(VersionParseError::Invalid(s.to_string()))
    }
}

/// `compatible?(a,b)`: true iff both numeric with equal
/// majors, or both branch with equal identifiers.
pub fn compatible(a: &Version, b: &Version) -> bool {
    match (a, b) {
        (Version::Numeric(a), Version::Numeric(b)) => a.major == b.major,
        (Version::Branch(a), Version::Branch(b)) => a == b,
        _ => false,
    }
}

/// `max(a,b)`: the higher of two compatible versions, or
/// `VersionConflict` if they are not compatible.
pub fn max(a: &Version, b: &Version) -> Result<Version, VersionConflict> {
    match (a, b) {
        (Version::Numeric(av), Version::Numeric(bv)) if av.major == bv.major => {
            if (av.minor, av.patch) >= (bv.minor, bv.patch) {
                Ok(a.clone())
            } else {
                Ok(b.clone())
            }
        }
        (Version::Branch(x), Version::Branch(y)) if x == y => Ok(a.clone()),
        _ => Err(VersionConflict(a.to_string(), b.to_string())),
    }
}
