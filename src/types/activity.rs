use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::aspect::{AdviceType, JoinpointScope};
use super::value::Value;

thread_local! {
    static CURRENT: RefCell<Option<Rc<Activity>>> = const { RefCell::new(None) };
}

/// Where a recorded failure came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorOrigin {
    Target,
    Advice {
        aspect_id: String,
        advice_type: AdviceType,
    },
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorOrigin::Target => f.write_str("target"),
            ErrorOrigin::Advice {
                aspect_id,
                advice_type,
            } => write!(f, "{advice_type} advice of '{aspect_id}'"),
        }
    }
}

/// Snapshot of the first failure raised during an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaisedError {
    origin: ErrorOrigin,
    type_name: &'static str,
    message: String,
}

impl RaisedError {
    #[must_use]
    pub fn origin(&self) -> &ErrorOrigin {
        &self.origin
    }

    /// Rust type name of the error value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The in-flight operation: its identity plus the state advice reads and
/// writes while it runs.
///
/// An activity belongs to one thread. It is shared through `Rc` and is
/// neither `Sync` nor meant to outlive its operation.
#[derive(Debug)]
pub struct Activity {
    route: String,
    scope: JoinpointScope,
    ended: Cell<bool>,
    raised: RefCell<Option<RaisedError>>,
    results: RefCell<HashMap<(String, AdviceType), Value>>,
    settings: RefCell<BTreeMap<String, Value>>,
}

impl Activity {
    #[must_use]
    pub fn new(route: &str, scope: JoinpointScope) -> Self {
        Self {
            route: route.to_owned(),
            scope,
            ended: Cell::new(false),
            raised: RefCell::new(None),
            results: RefCell::new(HashMap::new()),
            settings: RefCell::new(BTreeMap::new()),
        }
    }

    /// Bind `activity` to the current thread until the guard drops.
    ///
    /// If an activity is already bound, the call does nothing and the
    /// returned guard leaves the existing binding in place.
    #[must_use = "the activity is unbound when the guard drops"]
    pub fn bind(activity: &Rc<Activity>) -> ActivityGuard {
        let bound = CURRENT.with(|current| {
            let mut slot = current.borrow_mut();
            if slot.is_some() {
                false
            } else {
                *slot = Some(Rc::clone(activity));
                true
            }
        });
        if bound {
            tracing::trace!(route = %activity.route, "activity bound");
        }
        ActivityGuard {
            bound,
            _thread: PhantomData,
        }
    }

    /// The activity bound to this thread, if any.
    #[must_use]
    pub fn current() -> Option<Rc<Activity>> {
        CURRENT.with(|current| current.borrow().clone())
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    #[must_use]
    pub fn scope(&self) -> JoinpointScope {
        self.scope
    }

    /// Mark the operation as decided. Only finally-advice runs afterwards.
    /// Never reset.
    pub fn end(&self) {
        self.ended.set(true);
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended.get()
    }

    /// The first failure recorded for this operation.
    #[must_use]
    pub fn raised(&self) -> Option<RaisedError> {
        self.raised.borrow().clone()
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.borrow().is_some()
    }

    /// Record a failure. Returns `false` if one was already recorded.
    pub(crate) fn raise(&self, origin: ErrorOrigin, type_name: &'static str, message: String) -> bool {
        let mut slot = self.raised.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(RaisedError {
            origin,
            type_name,
            message,
        });
        true
    }

    #[must_use]
    pub fn setting(&self, name: &str) -> Option<Value> {
        self.settings.borrow().get(name).cloned()
    }

    /// Publish settings without replacing values already present.
    pub(crate) fn merge_settings(&self, settings: &BTreeMap<String, Value>) {
        let mut current = self.settings.borrow_mut();
        for (name, value) in settings {
            current
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }

    pub(crate) fn record_result(&self, aspect_id: &str, advice_type: AdviceType, value: Value) {
        self.results
            .borrow_mut()
            .insert((aspect_id.to_owned(), advice_type), value);
    }

    /// Value returned by an aspect's advice of the given type.
    #[must_use]
    pub fn advice_result(&self, aspect_id: &str, advice_type: AdviceType) -> Option<Value> {
        self.results
            .borrow()
            .get(&(aspect_id.to_owned(), advice_type))
            .cloned()
    }

    #[must_use]
    pub fn before_result(&self, aspect_id: &str) -> Option<Value> {
        self.advice_result(aspect_id, AdviceType::Before)
    }

    #[must_use]
    pub fn after_result(&self, aspect_id: &str) -> Option<Value> {
        self.advice_result(aspect_id, AdviceType::After)
    }

    #[must_use]
    pub fn finally_result(&self, aspect_id: &str) -> Option<Value> {
        self.advice_result(aspect_id, AdviceType::Finally)
    }
}

/// Unbinds the thread's activity on drop, if this guard bound it.
#[derive(Debug)]
pub struct ActivityGuard {
    bound: bool,
    _thread: PhantomData<Rc<()>>,
}

impl ActivityGuard {
    /// False when the bind was a no-op because another activity was bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        if self.bound {
            CURRENT.with(|current| current.borrow_mut().take());
        }
    }
}
