//! Parsing for `.lid` (library definition) files: line-oriented `Key:
//! value` headers, with indented continuation lines appended to the
//! previous value.

use deft_platform::{parse_platforms_header, Platform, PlatformParseError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LidParseError {
    #[error("missing required `Library:` header")]
    MissingLibrary,
    #[error("{0}")]
    Platforms(#[from] PlatformParseError),
}

/// A single library definition, parsed from one `.lid` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lid {
    pub library: String,
    pub platforms: Vec<Platform>,
    /// Names of other `.lid` files this one includes, via repeated `LID:`
    /// headers. A `.lid` named here by another file in the same package is
    /// an inclusion-only fragment and produces no registry entries itself.
    pub includes: Vec<String>,
    pub origin: Option<String>,
}

struct Fields {
    library: Option<String>,
    platforms_raw: Option<String>,
    includes: Vec<String>,
    origin: Option<String>,
}

fn apply(fields: &mut Fields, key: &str, value: &str) {
    match key {
        "Library" => fields.library = Some(value.to_string()),
        "Platforms" => fields.platforms_raw = Some(value.to_string()),
        "LID" => fields.includes.push(value.to_string()),
        "Origin" => fields.origin = Some(value.to_string()),
        _ => {}
    }
}

pub fn parse(contents: &str) -> Result<Lid, LidParseError> {
    let mut fields = Fields {
        library: None,
        platforms_raw: None,
        includes: Vec::new(),
        origin: None,
    };

    let mut current_key: Option<String> = None;
    let mut current_value = String::new();

    for line in contents.lines() {
        if current_key.is_some() && line.starts_with(|c: char| c.is_whitespace()) && !line.trim().is_empty() {
            current_value.push(' ');
            current_value.push_str(line.trim());
            continue;
        }

        if let Some(key) = current_key.take() {
            apply(&mut fields, &key, current_value.trim());
        }
        current_value.clear();

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            current_key = Some(key.trim().to_string());
            current_value = value.trim().to_string();
        }
    }
    if let Some(key) = current_key.take() {
        apply(&mut fields, &key, current_value.trim());
    }

    let library = fields.library.ok_or(LidParseError::MissingLibrary)?;
    let platforms = match fields.platforms_raw {
        Some(raw) => parse_platforms_header(&raw)?,
        None => Vec::new(),
    };

    Ok(Lid {
        library,
        platforms,
        includes: fields.includes,
        origin: fields.origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_lid() {
        let lid = parse("Library: widgets\n").unwrap();
        assert_eq!(lid.library, "widgets");
        assert!(lid.platforms.is_empty());
        assert!(lid.includes.is_empty());
    }

    #[test]
    fn missing_library_fails() {
        assert!(parse("Platforms: linux\n").is_err());
    }

    #[test]
    fn parses_platforms_and_includes() {
        let lid = parse("Library: widgets\nPlatforms: linux macos\nLID: shared.lid\nLID: extra.lid\n").unwrap();
        assert_eq!(
            lid.platforms,
            vec![Platform::Name("linux".into()), Platform::Name("macos".into())]
        );
        assert_eq!(lid.includes, vec!["shared.lid".to_string(), "extra.lid".to_string()]);
    }

    #[test]
    fn continuation_lines_are_appended() {
        let lid = parse("Library: widgets\nPlatforms: linux\n  macos\n  windows\n").unwrap();
        assert_eq!(
            lid.platforms,
            vec![
                Platform::Name("linux".into()),
                Platform::Name("macos".into()),
                Platform::Name("windows".into()),
            ]
        );
    }

    #[test]
    fn origin_is_recorded() {
        let lid = parse("Library: widgets\nOrigin: vendor/upstream\n").unwrap();
        assert_eq!(lid.origin.as_deref(), Some("vendor/upstream"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let lid = parse("Library: widgets\nAuthor: nobody\n").unwrap();
        assert_eq!(lid.library, "widgets");
    }
}
