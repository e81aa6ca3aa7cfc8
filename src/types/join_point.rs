use std::fmt;

use super::aspect::JoinpointScope;

const SEPARATOR: char = '|';
const ABSENT: char = '*';
const ESCAPE: char = '\\';

/// Cache key for one join point: scope, route, component, and operation.
///
/// Parts are joined with `|`. A missing part is written as a bare `*`, and
/// `\`, `|` and `*` inside a part are escaped, so distinct triples never
/// share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinPointKey(String);

impl JoinPointKey {
    #[must_use]
    pub fn new(
        scope: Option<JoinpointScope>,
        route: Option<&str>,
        component: Option<&str>,
        operation: Option<&str>,
    ) -> Self {
        let mut key = String::new();
        match scope {
            Some(scope) => key.push_str(&format!("{scope:?}")),
            None => key.push(ABSENT),
        }
        for part in [route, component, operation] {
            key.push(SEPARATOR);
            match part {
                Some(text) => push_escaped(&mut key, text),
                None => key.push(ABSENT),
            }
        }
        Self(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn push_escaped(key: &mut String, text: &str) {
    for c in text.chars() {
        if matches!(c, SEPARATOR | ABSENT | ESCAPE) {
            key.push(ESCAPE);
        }
        key.push(c);
    }
}

impl fmt::Display for JoinPointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
