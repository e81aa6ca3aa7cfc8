use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::{AdviceSet, JoinPointKey};

/// Counters describing cache use since creation or the last clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub builds: u64,
}

/// Memoized advice sets, one per join-point key.
///
/// Each key owns a `OnceLock`, so concurrent first lookups of the same key
/// run the builder once; the others wait on that key only. Entries are never
/// evicted, only dropped all at once by [`AdviceResolutionCache::clear`].
#[derive(Debug, Default)]
pub struct AdviceResolutionCache {
    entries: DashMap<JoinPointKey, Arc<OnceLock<Arc<AdviceSet>>>>,
    hits: AtomicU64,
    builds: AtomicU64,
}

impl AdviceResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the set cached under `key`, running `build` if there is none yet.
    pub fn get_or_build(&self, key: &JoinPointKey, build: impl FnOnce() -> AdviceSet) -> Arc<AdviceSet> {
        if let Some(set) = self.entries.get(key).and_then(|cell| cell.get().cloned()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return set;
        }

        // Clone the cell out so the shard lock is released before building.
        let cell = Arc::clone(self.entries.entry(key.clone()).or_default().value());
        let mut built = false;
        let set = cell.get_or_init(|| {
            built = true;
            Arc::new(build())
        });
        if built {
            self.builds.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, aspects = set.aspect_count(), "advice set built");
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Arc::clone(set)
    }

    /// The cached set for `key`, without building.
    #[must_use]
    pub fn get(&self, key: &JoinPointKey) -> Option<Arc<AdviceSet>> {
        self.entries.get(key).and_then(|cell| cell.get().cloned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.builds.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JoinpointScope;

    fn key(op: &str) -> JoinPointKey {
        JoinPointKey::new(Some(JoinpointScope::Route), Some("/r"), Some("c"), Some(op))
    }

    #[test]
    fn builds_once_then_hits() {
        let cache = AdviceResolutionCache::new();
        let mut calls = 0;
        let first = cache.get_or_build(&key("a"), || {
            calls += 1;
            AdviceSet::default()
        });
        let second = cache.get_or_build(&key("a"), || {
            calls += 1;
            AdviceSet::default()
        });
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                builds: 1
            }
        );
    }

    #[test]
    fn distinct_keys_build_separately() {
        let cache = AdviceResolutionCache::new();
        cache.get_or_build(&key("a"), AdviceSet::default);
        cache.get_or_build(&key("b"), AdviceSet::default);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().builds, 2);
    }

    #[test]
    fn get_does_not_build() {
        let cache = AdviceResolutionCache::new();
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_resets() {
        let cache = AdviceResolutionCache::new();
        cache.get_or_build(&key("a"), AdviceSet::default);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
