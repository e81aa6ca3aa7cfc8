use std::fmt::Display;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::{AdviceResolutionCache, CacheStats};
use crate::intercept::intercept;
use crate::{
    Activity, AdviceSet, AspectRule, AspectRuleStore, ConfigError, InvokeError, JoinPointKey,
    JoinpointScope, Outcome,
};

/// Builder for a [`Weaver`].
///
/// ```
/// use weft::{AspectRule, Pointcut, Weaver};
///
/// let weaver = Weaver::builder()
///     .aspect(
///         AspectRule::builder("audit")
///             .pointcut(Pointcut::builder().include("orders/**").build().unwrap())
///             .before(|_| Ok(None))
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
/// assert_eq!(weaver.aspect_ids(), vec!["audit".to_owned()]);
/// ```
#[derive(Debug, Default)]
pub struct WeaverBuilder {
    rules: Vec<AspectRule>,
}

impl WeaverBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn aspect(mut self, rule: AspectRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Register every aspect in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateAspect`] on a repeated id.
    pub fn build(self) -> Result<Weaver, ConfigError> {
        let mut store = AspectRuleStore::new();
        for rule in self.rules {
            store.register(rule)?;
        }
        Ok(Weaver::from_store(store))
    }
}

#[derive(Debug)]
struct Inner {
    store: RwLock<AspectRuleStore>,
    cache: AdviceResolutionCache,
}

/// Owns the registered aspects and the per-join-point advice cache.
///
/// Cheap to clone; clones share state. Safe to use from many threads.
#[derive(Debug, Clone)]
pub struct Weaver {
    inner: Arc<Inner>,
}

impl Weaver {
    #[must_use]
    pub fn builder() -> WeaverBuilder {
        WeaverBuilder::new()
    }

    #[must_use]
    pub fn from_store(store: AspectRuleStore) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: RwLock::new(store),
                cache: AdviceResolutionCache::new(),
            }),
        }
    }

    /// The advice set for a join point, assembled at most once per key.
    #[must_use]
    pub fn resolve(
        &self,
        scope: Option<JoinpointScope>,
        route: Option<&str>,
        component: Option<&str>,
        operation: Option<&str>,
    ) -> Arc<AdviceSet> {
        let key = JoinPointKey::new(scope, route, component, operation);
        self.inner.cache.get_or_build(&key, || {
            self.inner
                .store
                .read()
                .assemble(scope, route, component, operation)
        })
    }

    /// Whether any aspect could apply to `component_id`, before the route
    /// and operation are known.
    #[must_use]
    pub fn may_advise(&self, component_id: &str) -> bool {
        self.inner.store.read().all().iter().any(|rule| {
            rule.weaves_components()
                && rule.pointcut().is_none_or(|pc| pc.may_match(component_id))
        })
    }

    /// Wrap `target` so that calls through it run the matching advice.
    pub fn wrap<T>(&self, target: T, component_id: &str) -> Proxied<T> {
        let advised = self.may_advise(component_id);
        tracing::debug!(component = component_id, advised, "component wrapped");
        Proxied {
            target,
            component_id: component_id.to_owned(),
            weaver: self.clone(),
            advised,
        }
    }

    /// Toggle an aspect at runtime. Returns `false` if the id is unknown.
    pub fn set_disabled(&self, id: &str, disabled: bool) -> bool {
        match self.inner.store.read().get(id) {
            Some(rule) => {
                rule.set_disabled(disabled);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn aspect_ids(&self) -> Vec<String> {
        self.inner
            .store
            .read()
            .all()
            .iter()
            .map(|r| r.id().to_owned())
            .collect()
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Teardown: drop every aspect and every cached advice set.
    pub fn destroy(&self) {
        let mut store = self.inner.store.write();
        let aspects = store.len();
        store.clear();
        self.inner.cache.clear();
        tracing::debug!(aspects, "weaver destroyed");
    }
}

/// A component wrapped by a [`Weaver`].
///
/// Calls name the operation and pass a closure that runs it against the
/// wrapped value; the advice chain for `(route, component, operation)`
/// runs around that closure.
#[derive(Debug)]
pub struct Proxied<T> {
    target: T,
    component_id: String,
    weaver: Weaver,
    advised: bool,
}

impl<T> Proxied<T> {
    /// Call through the activity bound to this thread.
    ///
    /// # Errors
    ///
    /// [`InvokeError::NoActivity`] when no activity is bound; otherwise see
    /// [`Proxied::call_in`].
    pub fn call<R, E: Display>(
        &self,
        operation: &str,
        f: impl FnOnce(&T) -> Result<R, E>,
    ) -> Result<Outcome<R>, InvokeError<E>> {
        let activity = Activity::current().ok_or(InvokeError::NoActivity)?;
        self.call_in(&activity, operation, f)
    }

    /// Call with an explicit activity.
    ///
    /// # Errors
    ///
    /// [`InvokeError::Target`] carries the operation's own unhandled error;
    /// [`InvokeError::Advice`] a failing advice.
    pub fn call_in<R, E: Display>(
        &self,
        activity: &Activity,
        operation: &str,
        f: impl FnOnce(&T) -> Result<R, E>,
    ) -> Result<Outcome<R>, InvokeError<E>> {
        let target = &self.target;
        if !self.advised {
            return f(target).map(Outcome::Returned).map_err(InvokeError::Target);
        }
        let set = self.advice_for(activity, operation);
        intercept(&set, activity, || f(target))
    }

    /// Like [`Proxied::call`], with mutable access to the target.
    ///
    /// # Errors
    ///
    /// See [`Proxied::call`].
    pub fn call_mut<R, E: Display>(
        &mut self,
        operation: &str,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<Outcome<R>, InvokeError<E>> {
        let activity = Activity::current().ok_or(InvokeError::NoActivity)?;
        if !self.advised {
            return f(&mut self.target)
                .map(Outcome::Returned)
                .map_err(InvokeError::Target);
        }
        let set = self.advice_for(&activity, operation);
        let target = &mut self.target;
        intercept(&set, &activity, || f(target))
    }

    fn advice_for(&self, activity: &Activity, operation: &str) -> Arc<AdviceSet> {
        self.weaver.resolve(
            Some(activity.scope()),
            Some(activity.route()),
            Some(&self.component_id),
            Some(operation),
        )
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[must_use]
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// False when no aspect could ever apply; calls then skip resolution.
    #[must_use]
    pub fn is_advised(&self) -> bool {
        self.advised
    }

    pub fn into_inner(self) -> T {
        self.target
    }
}
