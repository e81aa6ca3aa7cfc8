mod error;
mod grammar;
mod parser;

pub use error::{ParseError, PatternError};
pub use parser::{RawEntry, RawTriple};

use crate::types::wildcard::Token;

/// Parse pointcut expression text into its signed entries.
///
/// One entry per line: `+ route@component^operation` includes,
/// `- route@component^operation` excludes. Any part may be omitted.
/// Lines starting with `#` are comments.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid pointcut text.
pub fn parse(input: &str) -> Result<Vec<RawEntry>, ParseError> {
    use winnow::Parser;
    grammar::pointcut_entries
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}

/// Parse a single `route@component^operation` triple.
///
/// # Errors
///
/// Returns [`ParseError`] if the triple is empty or spans several lines.
pub fn parse_triple(input: &str) -> Result<RawTriple, ParseError> {
    use winnow::Parser;
    grammar::single_triple
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}

pub(crate) fn tokenize(pattern: &str, separator: Option<char>) -> Result<Vec<Token>, PatternError> {
    use winnow::Parser;
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    grammar::wildcard_tokens(separator)
        .parse(pattern)
        .map_err(|e| PatternError::Syntax {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        })
}
