use thiserror::Error;

use crate::pattern::ParseError;

/// Configuration-time failures. These surface while aspects are being
/// registered and are fatal to startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate aspect id '{id}'")]
    DuplicateAspect { id: String },

    #[error("aspect id must not be empty")]
    EmptyAspectId,

    #[error("invalid wildcard pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_aspect_message() {
        let err = ConfigError::DuplicateAspect {
            id: "audit".into(),
        };
        assert_eq!(err.to_string(), "duplicate aspect id 'audit'");
    }

    #[test]
    fn empty_id_message() {
        assert_eq!(
            ConfigError::EmptyAspectId.to_string(),
            "aspect id must not be empty"
        );
    }

    #[test]
    fn invalid_pattern_message() {
        let err = ConfigError::InvalidPattern {
            pattern: "/a/***".into(),
            reason: "too many stars".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid wildcard pattern '/a/***': too many stars"
        );
    }

    #[test]
    fn invalid_regex_message() {
        let err = ConfigError::InvalidRegex {
            pattern: "(".into(),
            reason: "unclosed group".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid regular expression '(': unclosed group"
        );
    }

    #[test]
    fn parse_error_is_transparent() {
        let err = ConfigError::from(ParseError::new("bad line"));
        assert_eq!(err.to_string(), "pointcut parse error: bad line");
    }
}
