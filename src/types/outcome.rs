use std::fmt;

/// Result of an intercepted call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<R> {
    /// The target ran and produced a value.
    Returned(R),
    /// Advice ended the activity; there is no value.
    Handled,
}

impl<R> Outcome<R> {
    pub fn returned(self) -> Option<R> {
        match self {
            Outcome::Returned(r) => Some(r),
            Outcome::Handled => None,
        }
    }

    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled)
    }

    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Outcome<U> {
        match self {
            Outcome::Returned(r) => Outcome::Returned(f(r)),
            Outcome::Handled => Outcome::Handled,
        }
    }
}

impl<R: fmt::Display> fmt::Display for Outcome<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Returned(r) => write!(f, "returned {r}"),
            Outcome::Handled => f.write_str("handled"),
        }
    }
}
