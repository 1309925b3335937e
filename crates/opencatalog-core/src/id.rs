use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Natural-key names that collide with routing and are never valid.
const RESERVED_NAMES: &[&str] = &["new", "edit", "search"];

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters long")]
    BadLength,

    #[error("Name must be purely lowercase alphanumeric (ascii) characters and these symbols: -_")]
    BadCharacters,

    #[error("That name cannot be used")]
    Reserved,
}

/// Generates a fresh surrogate id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9_-]+$").expect("static pattern"))
}

/// Validates a natural-key name (user, group or package name).
///
/// Names are the identifiers exposed in URLs and update payloads, so the
/// rules are strict: lowercase ascii alphanumerics plus `-` and `_`,
/// length 2-100, and a handful of reserved words are rejected.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.len() < NAME_MIN_LEN || name.len() > NAME_MAX_LEN {
        return Err(NameError::BadLength);
    }
    if !name_pattern().is_match(name) {
        return Err(NameError::BadCharacters);
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(NameError::Reserved);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_valid_names() {
        for name in ["ab", "my-dataset", "group_01", "a2", &"a".repeat(100)] {
            assert!(validate_name(name).is_ok(), "expected {name:?} to be valid");
        }
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(validate_name(""), Err(NameError::BadLength));
        assert_eq!(validate_name("a"), Err(NameError::BadLength));
        assert_eq!(validate_name(&"a".repeat(101)), Err(NameError::BadLength));
    }

    #[test]
    fn test_bad_characters() {
        for name in ["Hi!", "i++%", "With Space", "UPPER", "caf\u{e9}"] {
            assert_eq!(
                validate_name(name),
                Err(NameError::BadCharacters),
                "expected {name:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_reserved_names() {
        for name in ["new", "edit", "search"] {
            assert_eq!(validate_name(name), Err(NameError::Reserved));
        }
    }
}
