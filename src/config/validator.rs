//! Registration checks: SQL identifiers and URL prefixes.

use crate::error::ConfigError;
use regex::Regex;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";
const PREFIX_PATTERN: &str = r"^(/[A-Za-z0-9_.~-]+)+$";

/// Table and column names are interpolated into SQL, so only plain identifiers are accepted.
pub fn validate_identifier(kind: &'static str, name: &str) -> Result<(), ConfigError> {
    let re = Regex::new(IDENTIFIER_PATTERN).map_err(|e| ConfigError::Env(e.to_string()))?;
    if !re.is_match(name) {
        return Err(ConfigError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// A prefix starts with `/`, has no trailing slash and no router syntax (`:`, `*`, `{`).
pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    let re = Regex::new(PREFIX_PATTERN).map_err(|e| ConfigError::Env(e.to_string()))?;
    if !re.is_match(prefix) {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(validate_identifier("table", "test").is_ok());
        assert!(validate_identifier("column", "_string_attr2").is_ok());
        assert!(validate_identifier("column", "2col").is_err());
        assert!(validate_identifier("column", "a\"b").is_err());
        assert!(validate_identifier("column", "").is_err());
    }

    #[test]
    fn prefixes() {
        assert!(validate_prefix("/api/test").is_ok());
        assert!(validate_prefix("/v1.0/items-x").is_ok());
        assert!(validate_prefix("api/test").is_err());
        assert!(validate_prefix("/api/test/").is_err());
        assert!(validate_prefix("/api/:id").is_err());
        assert!(validate_prefix("/").is_err());
    }
}
