//! Package name validation.

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("package name cannot be empty")]
    Empty,
    #[error("package name `{0}` must start with an ASCII letter")]
    BadStart(String),
    #[error(
        "package name `{0}` contains an invalid character; only ASCII letters, digits, `.`, `_`, and `-` are allowed"
    )]
    BadChar(String),
}

/// Validates a package name against the `[A-Za-z][A-Za-z0-9._-]*` grammar.
pub fn validate_package_name(name: &str) -> Result<(), NameError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(NameError::Empty)?;
    if !first.is_ascii_alphabetic() {
        return Err(NameError::BadStart(name.to_string()));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
        return Err(NameError::BadChar(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        for name in ["x", "X", "x-y", "x---", "a123", "a.test"] {
            assert!(validate_package_name(name).is_ok(), "expected {name} to be valid");
        }
    }

    #[test]
    fn rejects_invalid_names() {
        for name in ["", "-x", "0foo", "abc%"] {
            assert!(validate_package_name(name).is_err(), "expected {name} to be invalid");
        }
    }

    #[test]
    fn reports_the_offending_name() {
        let err = validate_package_name("0foo").unwrap_err();
        assert!(err.to_string().contains("0foo"));
        let err = validate_package_name("abc%").unwrap_err();
        assert!(err.to_string().contains("abc%"));
    }
}
