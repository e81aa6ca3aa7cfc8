use std::fmt;

use crate::pattern::{self, PatternError};

/// Segment separator for route names.
pub const ROUTE_SEPARATOR: char = '/';

/// Segment separator for component identifiers.
pub const COMPONENT_SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(char),
    Separator,
    Star,
    StarStar,
    Question,
    Plus,
}

impl Token {
    fn is_wildcard(self) -> bool {
        matches!(
            self,
            Token::Star | Token::StarStar | Token::Question | Token::Plus
        )
    }

    fn weight(self) -> f32 {
        match self {
            Token::Literal(_) | Token::Separator => 1.0,
            Token::Question => 0.5,
            Token::Plus => 0.4,
            Token::Star => 0.2,
            Token::StarStar => 0.1,
        }
    }
}

/// A compiled wildcard pattern.
///
/// Grammar:
/// - `*` matches zero or more characters within one segment
/// - `**` matches zero or more characters across segments; `**<sep>` may
///   also match zero whole segments
/// - `?` matches exactly one non-separator character
/// - `+` matches one or more non-separator characters
/// - `\` escapes the next character
///
/// Matching is anchored at both ends. Without a separator, `*` and `**`
/// behave the same.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    separator: Option<char>,
    ignore_case: bool,
    tokens: Vec<Token>,
    literal: Option<String>,
}

impl WildcardPattern {
    /// Compile `pattern` with the given segment separator.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for an empty pattern, a dangling `\`, or a
    /// run of three or more `*`.
    pub fn compile(pattern: &str, separator: Option<char>) -> Result<Self, PatternError> {
        Self::build(pattern, separator, false)
    }

    /// Like [`WildcardPattern::compile`], comparing characters without regard to case.
    ///
    /// # Errors
    ///
    /// See [`WildcardPattern::compile`].
    pub fn compile_ignore_case(
        pattern: &str,
        separator: Option<char>,
    ) -> Result<Self, PatternError> {
        Self::build(pattern, separator, true)
    }

    fn build(pattern: &str, separator: Option<char>, ignore_case: bool) -> Result<Self, PatternError> {
        let tokens = pattern::tokenize(pattern, separator)?;
        let literal = if tokens.iter().any(|t| t.is_wildcard()) {
            None
        } else {
            Some(
                tokens
                    .iter()
                    .map(|t| match t {
                        Token::Literal(c) => *c,
                        _ => separator.unwrap_or_default(),
                    })
                    .collect(),
            )
        };
        Ok(Self {
            source: pattern.to_owned(),
            separator,
            ignore_case,
            tokens,
            literal,
        })
    }

    /// Whether `s` contains any wildcard character.
    #[must_use]
    pub fn has_wildcards(s: &str) -> bool {
        s.contains(['*', '?', '+'])
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn separator(&self) -> Option<char> {
        self.separator
    }

    #[must_use]
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// True when the pattern has no wildcard tokens and matches one string only.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }

    /// Precedence score. Literal characters and separators weigh the most,
    /// `**` the least, so longer and more specific patterns rank higher.
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.tokens.iter().map(|t| t.weight()).sum()
    }

    /// Whole-string match of `candidate` against this pattern.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        if let Some(literal) = &self.literal {
            return if self.ignore_case {
                literal.to_lowercase() == candidate.to_lowercase()
            } else {
                literal == candidate
            };
        }
        let input: Vec<char> = candidate.chars().collect();
        self.table(&input).get(0, 0)
    }

    /// Characters of `candidate` consumed by wildcard tokens, plus any
    /// separator directly following a `*` or `**`.
    ///
    /// `com.example.**` masks `com.example.user.UserService` to
    /// `user.UserService`. Returns `None` when `candidate` does not match.
    #[must_use]
    pub fn mask(&self, candidate: &str) -> Option<String> {
        let input: Vec<char> = candidate.chars().collect();
        let table = self.table(&input);
        if !table.get(0, 0) {
            return None;
        }

        let (nt, nc) = (self.tokens.len(), input.len());
        let (mut ti, mut ci) = (0, 0);
        let mut masked = String::new();
        while ti < nt {
            match self.tokens[ti] {
                Token::Literal(_) => {
                    ti += 1;
                    ci += 1;
                }
                Token::Separator => {
                    if ci == nc {
                        break;
                    }
                    if ti > 0 && matches!(self.tokens[ti - 1], Token::Star | Token::StarStar) {
                        masked.push(input[ci]);
                    }
                    ti += 1;
                    ci += 1;
                }
                Token::Question => {
                    masked.push(input[ci]);
                    ti += 1;
                    ci += 1;
                }
                Token::Plus => {
                    masked.push(input[ci]);
                    ci += 1;
                    if !table.get(ti, ci) {
                        ti += 1;
                    }
                }
                Token::Star => {
                    if ci < nc && !self.is_separator(input[ci]) && table.get(ti, ci + 1) {
                        masked.push(input[ci]);
                        ci += 1;
                    } else {
                        ti += 1;
                    }
                }
                Token::StarStar => {
                    if ci < nc && table.get(ti, ci + 1) {
                        masked.push(input[ci]);
                        ci += 1;
                    } else if table.get(ti + 1, ci) {
                        ti += 1;
                    } else {
                        ti += 2;
                    }
                }
            }
        }
        Some(masked)
    }

    fn is_separator(&self, c: char) -> bool {
        self.separator == Some(c)
    }

    fn char_eq(&self, a: char, b: char) -> bool {
        a == b || (self.ignore_case && a.to_lowercase().eq(b.to_lowercase()))
    }

    fn at_segment_start(&self, input: &[char], ci: usize) -> bool {
        ci == 0 || self.is_separator(input[ci - 1])
    }

    /// `table.get(t, c)`: tokens `t..` match `input[c..]`.
    fn table(&self, input: &[char]) -> MatchTable {
        let tokens = &self.tokens;
        let (nt, nc) = (tokens.len(), input.len());
        let mut table = MatchTable::new(nt, nc);
        table.set(nt, nc, true);

        for ti in (0..nt).rev() {
            for ci in (0..=nc).rev() {
                let ch = input.get(ci).copied();
                let segment_char = ch.is_some_and(|c| !self.is_separator(c));
                let hit = match tokens[ti] {
                    Token::Literal(l) => {
                        ch.is_some_and(|c| self.char_eq(c, l)) && table.get(ti + 1, ci + 1)
                    }
                    Token::Separator => match ch {
                        Some(c) => self.is_separator(c) && table.get(ti + 1, ci + 1),
                        None => tokens[ti + 1..] == [Token::StarStar],
                    },
                    Token::Question => segment_char && table.get(ti + 1, ci + 1),
                    Token::Plus => {
                        segment_char && (table.get(ti + 1, ci + 1) || table.get(ti, ci + 1))
                    }
                    Token::Star => {
                        table.get(ti + 1, ci) || (segment_char && table.get(ti, ci + 1))
                    }
                    Token::StarStar => {
                        table.get(ti + 1, ci)
                            || (ch.is_some() && table.get(ti, ci + 1))
                            || (tokens.get(ti + 1) == Some(&Token::Separator)
                                && self.at_segment_start(input, ci)
                                && table.get(ti + 2, ci))
                    }
                };
                table.set(ti, ci, hit);
            }
        }
        table
    }
}

struct MatchTable {
    width: usize,
    cells: Vec<bool>,
}

impl MatchTable {
    fn new(tokens: usize, chars: usize) -> Self {
        let width = chars + 2;
        Self {
            width,
            cells: vec![false; (tokens + 2) * width],
        }
    }

    fn get(&self, ti: usize, ci: usize) -> bool {
        self.cells[ti * self.width + ci]
    }

    fn set(&mut self, ti: usize, ci: usize, value: bool) {
        self.cells[ti * self.width + ci] = value;
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.separator == other.separator
            && self.ignore_case == other.ignore_case
    }
}

impl Eq for WildcardPattern {}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
