use crate::pattern::PatternError;

use super::wildcard::WildcardPattern;

/// Include/exclude combinator over wildcard patterns.
///
/// A candidate matches when at least one include pattern accepts it and no
/// exclude pattern does. An empty include list accepts everything that is
/// not excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeExcludePatterns {
    includes: Vec<WildcardPattern>,
    excludes: Vec<WildcardPattern>,
}

impl IncludeExcludePatterns {
    /// Compile both lists with the same separator.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] encountered.
    pub fn compile<I, E>(includes: I, excludes: E, separator: Option<char>) -> Result<Self, PatternError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Ok(Self {
            includes: compile_all(includes, separator)?,
            excludes: compile_all(excludes, separator)?,
        })
    }

    #[must_use]
    pub fn includes(&self) -> &[WildcardPattern] {
        &self.includes
    }

    #[must_use]
    pub fn excludes(&self) -> &[WildcardPattern] {
        &self.excludes
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        if self.excludes.iter().any(|p| p.matches(candidate)) {
            return false;
        }
        self.includes.is_empty() || self.includes.iter().any(|p| p.matches(candidate))
    }
}

fn compile_all<T>(patterns: T, separator: Option<char>) -> Result<Vec<WildcardPattern>, PatternError>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| WildcardPattern::compile(p.as_ref(), separator))
        .collect()
}
