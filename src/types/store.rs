use std::collections::HashMap;

use super::advice_set::AdviceSet;
use super::aspect::{AspectRule, JoinpointScope};
use super::error::ConfigError;

/// Registry of aspects in registration order.
#[derive(Debug, Default)]
pub struct AspectRuleStore {
    rules: Vec<AspectRule>,
    index: HashMap<String, usize>,
}

impl AspectRuleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateAspect`] if the id is taken. The
    /// existing rule is left in place.
    pub fn register(&mut self, rule: AspectRule) -> Result<(), ConfigError> {
        if self.index.contains_key(rule.id()) {
            return Err(ConfigError::DuplicateAspect {
                id: rule.id().to_owned(),
            });
        }
        tracing::debug!(aspect = rule.id(), order = rule.order(), "aspect registered");
        self.index.insert(rule.id().to_owned(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AspectRule> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All rules in registration order.
    #[must_use]
    pub fn all(&self) -> &[AspectRule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Collect the advice of every eligible rule whose pointcut matches the
    /// triple. Rules are visited by ascending `order`, ties in registration
    /// order; each rule's advice keeps its declaration order.
    ///
    /// `None` parts are unknown and do not constrain matching.
    #[must_use]
    pub fn assemble(
        &self,
        scope: Option<JoinpointScope>,
        route: Option<&str>,
        component: Option<&str>,
        operation: Option<&str>,
    ) -> AdviceSet {
        crate::assemble::assemble(&self.rules, scope, route, component, operation)
    }

    pub fn clear(&mut self) {
        self.rules.clear();
        self.index.clear();
    }
}
