use std::error::Error as StdError;

use thiserror::Error;

use crate::AdviceType;

/// Failure of an advice action.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AdviceError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AdviceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it as the source.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of an intercepted call that did not complete normally.
///
/// `Target` carries the wrapped operation's own error unchanged.
#[derive(Debug, Error)]
pub enum InvokeError<E> {
    #[error(transparent)]
    Target(E),

    #[error("{advice_type} advice of aspect '{aspect_id}' failed: {source}")]
    Advice {
        aspect_id: String,
        advice_type: AdviceType,
        #[source]
        source: AdviceError,
    },

    #[error("no activity is bound to the current thread")]
    NoActivity,
}

impl<E> InvokeError<E> {
    /// The target's own error, if that is what failed.
    pub fn into_target(self) -> Option<E> {
        match self {
            InvokeError::Target(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_target(&self) -> bool {
        matches!(self, InvokeError::Target(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("order {0} not found")]
    struct NotFound(u32);

    #[test]
    fn target_is_transparent() {
        let err: InvokeError<NotFound> = InvokeError::Target(NotFound(7));
        assert_eq!(err.to_string(), "order 7 not found");
        assert!(err.is_target());
        assert_eq!(err.into_target(), Some(NotFound(7)));
    }

    #[test]
    fn advice_message() {
        let err: InvokeError<NotFound> = InvokeError::Advice {
            aspect_id: "audit".into(),
            advice_type: AdviceType::Before,
            source: AdviceError::new("denied"),
        };
        assert_eq!(
            err.to_string(),
            "before advice of aspect 'audit' failed: denied"
        );
        assert!(err.into_target().is_none());
    }

    #[test]
    fn no_activity_message() {
        let err: InvokeError<NotFound> = InvokeError::NoActivity;
        assert_eq!(
            err.to_string(),
            "no activity is bound to the current thread"
        );
    }

    #[test]
    fn advice_error_source() {
        let io = std::io::Error::other("disk full");
        let err = AdviceError::with_source("audit write failed", io);
        assert_eq!(err.to_string(), "audit write failed");
        assert_eq!(err.message(), "audit write failed");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("disk full"));
    }
}
