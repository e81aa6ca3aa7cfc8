use std::collections::BTreeMap;

use super::aspect::AdviceRule;
use super::value::Value;

/// The advice applicable to one join point, in execution order.
///
/// Built once per join point and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct AdviceSet {
    pub(crate) before: Vec<AdviceRule>,
    pub(crate) after: Vec<AdviceRule>,
    pub(crate) finally: Vec<AdviceRule>,
    pub(crate) exception: Vec<AdviceRule>,
    pub(crate) settings: BTreeMap<String, Value>,
    pub(crate) aspect_count: usize,
}

impl AdviceSet {
    #[must_use]
    pub fn before(&self) -> &[AdviceRule] {
        &self.before
    }

    #[must_use]
    pub fn after(&self) -> &[AdviceRule] {
        &self.after
    }

    #[must_use]
    pub fn finally(&self) -> &[AdviceRule] {
        &self.finally
    }

    #[must_use]
    pub fn exception(&self) -> &[AdviceRule] {
        &self.exception
    }

    /// Settings merged across contributing aspects; earlier aspects win.
    #[must_use]
    pub fn settings(&self) -> &BTreeMap<String, Value> {
        &self.settings
    }

    /// Number of aspects that contributed to this set.
    #[must_use]
    pub fn aspect_count(&self) -> usize {
        self.aspect_count
    }

    /// True when no aspect contributed. Calls then go straight to the target.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aspect_count == 0
    }

    /// Aspect ids per list as `(before, after, finally, exception)`.
    #[must_use]
    pub fn summary(&self) -> [Vec<&str>; 4] {
        fn ids(list: &[AdviceRule]) -> Vec<&str> {
            list.iter().map(AdviceRule::aspect_id).collect()
        }
        [
            ids(&self.before),
            ids(&self.after),
            ids(&self.finally),
            ids(&self.exception),
        ]
    }
}
