use std::fmt;

use regex::Regex;

use crate::pattern::{self, PatternError, RawTriple};

use super::error::ConfigError;
use super::wildcard::{COMPONENT_SEPARATOR, ROUTE_SEPARATOR, WildcardPattern};

/// How the parts of a pointcut pattern are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointcutKind {
    #[default]
    Wildcard,
    /// Each part is an anchored regular expression.
    Regex,
}

#[derive(Debug, Clone)]
enum PartMatcher {
    Wildcard(WildcardPattern),
    Regex(Regex),
}

impl PartMatcher {
    fn compile(
        kind: PointcutKind,
        source: &str,
        separator: Option<char>,
        ignore_case: bool,
    ) -> Result<Self, ConfigError> {
        match kind {
            PointcutKind::Wildcard => {
                let compiled = if ignore_case {
                    WildcardPattern::compile_ignore_case(source, separator)
                } else {
                    WildcardPattern::compile(source, separator)
                };
                compiled.map(PartMatcher::Wildcard).map_err(|e| {
                    let reason = match e {
                        PatternError::Syntax { message, .. } => message,
                        other => other.to_string(),
                    };
                    ConfigError::InvalidPattern {
                        pattern: source.to_owned(),
                        reason,
                    }
                })
            }
            PointcutKind::Regex => {
                let flags = if ignore_case { "(?i)" } else { "" };
                Regex::new(&format!("{flags}^(?:{source})$"))
                    .map(PartMatcher::Regex)
                    .map_err(|e| ConfigError::InvalidRegex {
                        pattern: source.to_owned(),
                        reason: e.to_string(),
                    })
            }
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        match self {
            PartMatcher::Wildcard(p) => p.matches(candidate),
            PartMatcher::Regex(r) => r.is_match(candidate),
        }
    }
}

/// One `(route, component, operation)` pattern triple. A missing part
/// places no constraint on that position.
#[derive(Debug, Clone)]
pub struct PointcutPattern {
    source: RawTriple,
    route: Option<PartMatcher>,
    component: Option<PartMatcher>,
    operation: Option<PartMatcher>,
}

impl PointcutPattern {
    fn compile(kind: PointcutKind, source: RawTriple, ignore_case: bool) -> Result<Self, ConfigError> {
        let part = |text: &Option<String>, separator| {
            text.as_deref()
                .map(|t| PartMatcher::compile(kind, t, separator, ignore_case))
                .transpose()
        };
        Ok(Self {
            route: part(&source.route, Some(ROUTE_SEPARATOR))?,
            component: part(&source.component, Some(COMPONENT_SEPARATOR))?,
            operation: part(&source.operation, None)?,
            source,
        })
    }

    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.source.route.as_deref()
    }

    #[must_use]
    pub fn component(&self) -> Option<&str> {
        self.source.component.as_deref()
    }

    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.source.operation.as_deref()
    }

    /// Include test. An unknown candidate part may still match.
    fn admits(&self, route: Option<&str>, component: Option<&str>, operation: Option<&str>) -> bool {
        fn admit(matcher: Option<&PartMatcher>, value: Option<&str>) -> bool {
            match (matcher, value) {
                (Some(m), Some(v)) => m.matches(v),
                _ => true,
            }
        }
        admit(self.route.as_ref(), route)
            && admit(self.component.as_ref(), component)
            && admit(self.operation.as_ref(), operation)
    }

    /// Exclude test. Only vetoes when every constrained part is known and matches.
    fn vetoes(&self, route: Option<&str>, component: Option<&str>, operation: Option<&str>) -> bool {
        fn veto(matcher: Option<&PartMatcher>, value: Option<&str>) -> bool {
            match (matcher, value) {
                (None, _) => true,
                (Some(m), Some(v)) => m.matches(v),
                (Some(_), None) => false,
            }
        }
        veto(self.route.as_ref(), route)
            && veto(self.component.as_ref(), component)
            && veto(self.operation.as_ref(), operation)
    }
}

impl fmt::Display for PointcutPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(route) = &self.source.route {
            f.write_str(route)?;
        }
        if let Some(component) = &self.source.component {
            write!(f, "@{component}")?;
        }
        if let Some(operation) = &self.source.operation {
            write!(f, "^{operation}")?;
        }
        Ok(())
    }
}

/// The predicate selecting the join points an aspect applies to.
///
/// A triple matches when it is admitted by at least one include pattern and
/// vetoed by no exclude pattern. A pointcut without includes matches nothing.
///
/// Matching is two-phase. At wrap time only the component is known, and
/// [`Pointcut::may_match`] gives a conservative "maybe" answer. Per call,
/// [`Pointcut::matches`] sees the full triple and gives the final answer.
#[derive(Debug, Clone)]
pub struct Pointcut {
    kind: PointcutKind,
    includes: Vec<PointcutPattern>,
    excludes: Vec<PointcutPattern>,
}

impl Pointcut {
    #[must_use]
    pub fn builder() -> PointcutBuilder {
        PointcutBuilder::default()
    }

    /// Parse wildcard pointcut text. See [`crate::pattern::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed text and
    /// [`ConfigError::InvalidPattern`] on a malformed wildcard.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::parse_as(PointcutKind::Wildcard, text)
    }

    /// Parse pointcut text whose parts are interpreted as `kind`.
    ///
    /// # Errors
    ///
    /// See [`Pointcut::parse`]; regex parts report [`ConfigError::InvalidRegex`].
    pub fn parse_as(kind: PointcutKind, text: &str) -> Result<Self, ConfigError> {
        let mut builder = Self::builder().kind(kind);
        for entry in pattern::parse(text)? {
            if entry.include {
                builder.includes.push(Ok(entry.triple));
            } else {
                builder.excludes.push(Ok(entry.triple));
            }
        }
        builder.build()
    }

    #[must_use]
    pub fn kind(&self) -> PointcutKind {
        self.kind
    }

    #[must_use]
    pub fn includes(&self) -> &[PointcutPattern] {
        &self.includes
    }

    #[must_use]
    pub fn excludes(&self) -> &[PointcutPattern] {
        &self.excludes
    }

    /// Full or partial triple match. `None` means the part is not known yet.
    #[must_use]
    pub fn matches(
        &self,
        route: Option<&str>,
        component: Option<&str>,
        operation: Option<&str>,
    ) -> bool {
        if self
            .excludes
            .iter()
            .any(|p| p.vetoes(route, component, operation))
        {
            return false;
        }
        self.includes
            .iter()
            .any(|p| p.admits(route, component, operation))
    }

    /// Phase one: could any call on `component` be matched?
    #[must_use]
    pub fn may_match(&self, component: &str) -> bool {
        self.matches(None, Some(component), None)
    }
}

/// Collects pointcut triples and compiles them in [`PointcutBuilder::build`].
///
/// ```
/// use weft::Pointcut;
///
/// let pc = Pointcut::builder()
///     .include("/orders/**@orderService")
///     .exclude("^get*")
///     .build()
///     .unwrap();
/// assert!(pc.matches(Some("/orders/delete"), Some("orderService"), Some("delete")));
/// assert!(!pc.matches(Some("/orders/list"), Some("orderService"), Some("getAll")));
/// ```
#[derive(Debug, Default)]
pub struct PointcutBuilder {
    kind: PointcutKind,
    ignore_case: bool,
    includes: Vec<Result<RawTriple, pattern::ParseError>>,
    excludes: Vec<Result<RawTriple, pattern::ParseError>>,
}

impl PointcutBuilder {
    #[must_use]
    pub fn kind(mut self, kind: PointcutKind) -> Self {
        self.kind = kind;
        self
    }

    /// Compare wildcard parts case-insensitively.
    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Add an include triple written as `route@component^operation`.
    #[must_use]
    pub fn include(mut self, triple: &str) -> Self {
        self.includes.push(pattern::parse_triple(triple));
        self
    }

    /// Add an exclude triple written as `route@component^operation`.
    #[must_use]
    pub fn exclude(mut self, triple: &str) -> Self {
        self.excludes.push(pattern::parse_triple(triple));
        self
    }

    /// Add an include triple from its parts.
    #[must_use]
    pub fn include_parts(
        mut self,
        route: Option<&str>,
        component: Option<&str>,
        operation: Option<&str>,
    ) -> Self {
        self.includes.push(Ok(RawTriple {
            route: route.map(str::to_owned),
            component: component.map(str::to_owned),
            operation: operation.map(str::to_owned),
        }));
        self
    }

    /// Compile every collected triple.
    ///
    /// # Errors
    ///
    /// Returns the first parse or pattern error, in insertion order.
    pub fn build(self) -> Result<Pointcut, ConfigError> {
        let Self {
            kind,
            ignore_case,
            includes,
            excludes,
        } = self;
        let compile_all = |triples: Vec<Result<RawTriple, pattern::ParseError>>| {
            triples
                .into_iter()
                .map(|t| PointcutPattern::compile(kind, t?, ignore_case))
                .collect::<Result<Vec<_>, ConfigError>>()
        };
        Ok(Pointcut {
            kind,
            includes: compile_all(includes)?,
            excludes: compile_all(excludes)?,
        })
    }
}
