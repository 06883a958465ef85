//! Deft's representation of a target platform tag.
//!
//! A LID file's `Platforms:` header lists the platform names a library is
//! built for; the registry generator (`deft::core::registry`) writes one
//! entry per listed name, or a single entry under the literal directory
//! `generic` when the header is absent. This crate owns just that
//! vocabulary: parsing a platform token and the literal `generic` fallback.
//! Unlike a full target-triple/cfg() expression language, Deft's platform
//! tags are opaque names the catalog and LID author agree on out of band.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single platform a library may be restricted to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// The fallback used when a LID carries no `Platforms:` header.
    Generic,
    /// A specific platform tag, e.g. `x86_64-linux` or `wasm32`.
    Name(String),
}

/// The literal directory name used for the fallback platform.
pub const GENERIC: &str = "generic";

impl Platform {
    /// The directory component this platform writes its registry entry
    /// under.
    pub fn directory(&self) -> &str {
        match self {
            Platform::Generic => GENERIC,
            Platform::Name(s) => s,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlatformParseError {
    #[error("platform name cannot be empty")]
    Empty,
    #[error(
        "invalid platform name `{0}`: must contain only alphanumerics, `-`, `_`, or `.`"
    )]
    InvalidChars(String),
    #[error("`{0}` is a reserved platform name; omit the Platforms: header for the generic case")]
    ReservedGeneric(String),
}

impl FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PlatformParseError::Empty);
        }
        if s.eq_ignore_ascii_case(GENERIC) {
            return Err(PlatformParseError::ReservedGeneric(s.to_string()));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(PlatformParseError::InvalidChars(s.to_string()));
        }
        Ok(Platform::Name(s.to_string()))
    }
}

/// Parses a `Platforms:` header value into the list of platforms a LID
/// targets. The value is whitespace-separated tokens.
pub fn parse_platforms_header(value: &str) -> Result<Vec<Platform>, PlatformParseError> {
    value.split_whitespace().map(Platform::from_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good(s: &str, expected: Platform) {
        match Platform::from_str(s) {
            Ok(p) => assert_eq!(p, expected),
            Err(e) => panic!("failed to parse `{s}`: {e}"),
        }
    }

    fn bad(s: &str, err: &str) {
        match Platform::from_str(s) {
            Ok(p) => panic!("expected `{s}` to fail but got {p}"),
            Err(e) => assert!(
                e.to_string().contains(err),
                "error for `{s}` was `{e}`, expected to contain `{err}`"
            ),
        }
    }

    #[test]
    fn parses_simple_names() {
        good("linux", Platform::Name("linux".into()));
        good("x86_64-linux", Platform::Name("x86_64-linux".into()));
        good("wasm32.wasi", Platform::Name("wasm32.wasi".into()));
    }

    #[test]
    fn rejects_empty_and_bad_chars() {
        bad("", "cannot be empty");
        bad("win/32", "must contain only");
        bad("win 32", "must contain only");
    }

    #[test]
    fn generic_is_reserved_as_input() {
        bad("generic", "reserved platform name");
        bad("Generic", "reserved platform name");
    }

    #[test]
    fn directory_names() {
        assert_eq!(Platform::Generic.directory(), "generic");
        assert_eq!(Platform::Name("linux".into()).directory(), "linux");
    }

    #[test]
    fn header_is_whitespace_separated() {
        let parsed = parse_platforms_header("linux   macos\twindows").unwrap();
        assert_eq!(
            parsed,
            vec![
                Platform::Name("linux".into()),
                Platform::Name("macos".into()),
                Platform::Name("windows".into()),
            ]
        );
    }

    #[test]
    fn header_rejects_embedded_generic() {
        let err = parse_platforms_header("linux generic").unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }
}
