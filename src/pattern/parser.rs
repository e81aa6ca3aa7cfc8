/// One `route@component^operation` triple as written. Empty parts are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTriple {
    pub route: Option<String>,
    pub component: Option<String>,
    pub operation: Option<String>,
}

impl RawTriple {
    pub(crate) fn is_empty(&self) -> bool {
        self.route.is_none() && self.component.is_none() && self.operation.is_none()
    }
}

/// A signed pointcut line: `+` includes, `-` excludes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub include: bool,
    pub triple: RawTriple,
}
