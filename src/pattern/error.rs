use thiserror::Error;

/// Errors produced when parsing pointcut expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pointcut parse error: {message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The underlying parser diagnostic.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A malformed wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,

    #[error("pattern '{pattern}': {message}")]
    Syntax { pattern: String, message: String },
}
