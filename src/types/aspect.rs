use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AdviceError;

use super::activity::Activity;
use super::error::ConfigError;
use super::pointcut::Pointcut;
use super::value::Value;

/// The kind of an advice action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdviceType {
    Before,
    After,
    /// Runs both before and after the target.
    Around,
    Finally,
    Exception,
}

impl fmt::Display for AdviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdviceType::Before => "before",
            AdviceType::After => "after",
            AdviceType::Around => "around",
            AdviceType::Finally => "finally",
            AdviceType::Exception => "exception",
        };
        f.write_str(name)
    }
}

/// The level at which an aspect applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinpointScope {
    /// The whole routed operation. Eligible at every level.
    #[default]
    Route,
    Request,
    Content,
    Response,
    Component,
}

/// What an aspect is declared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetType {
    #[default]
    Route,
    /// Scheduled jobs. Never woven into components.
    Scheduler,
}

/// An advice body.
///
/// Returning `Ok(Some(value))` records the value on the activity under the
/// owning aspect's id. Returning `Err` fails the advice.
///
/// Closures of the matching shape implement this trait.
pub trait AdviceAction: Send + Sync {
    /// Run the advice against the in-flight activity.
    ///
    /// # Errors
    ///
    /// Returns [`AdviceError`] when the advice fails.
    fn execute(&self, activity: &Activity) -> Result<Option<Value>, AdviceError>;
}

impl<F> AdviceAction for F
where
    F: Fn(&Activity) -> Result<Option<Value>, AdviceError> + Send + Sync,
{
    fn execute(&self, activity: &Activity) -> Result<Option<Value>, AdviceError> {
        self(activity)
    }
}

#[derive(Debug)]
pub(crate) struct AspectState {
    id: String,
    isolated: bool,
    disabled: AtomicBool,
}

/// One advice action bound to its owning aspect.
#[derive(Clone)]
pub struct AdviceRule {
    aspect: Arc<AspectState>,
    advice_type: AdviceType,
    action: Arc<dyn AdviceAction>,
}

impl AdviceRule {
    #[must_use]
    pub fn aspect_id(&self) -> &str {
        &self.aspect.id
    }

    #[must_use]
    pub fn advice_type(&self) -> AdviceType {
        self.advice_type
    }

    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.aspect.isolated
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.aspect.disabled.load(Ordering::Acquire)
    }

    pub(crate) fn execute(&self, activity: &Activity) -> Result<Option<Value>, AdviceError> {
        self.action.execute(activity)
    }
}

impl fmt::Debug for AdviceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdviceRule")
            .field("aspect_id", &self.aspect.id)
            .field("advice_type", &self.advice_type)
            .finish_non_exhaustive()
    }
}

/// A registered cross-cutting rule: a pointcut plus an ordered advice list.
///
/// Immutable once built, apart from the runtime `disabled` toggle.
#[derive(Debug)]
pub struct AspectRule {
    pub(crate) state: Arc<AspectState>,
    pub(crate) order: i32,
    pub(crate) scope: JoinpointScope,
    pub(crate) target_type: TargetType,
    pub(crate) route_only: bool,
    pub(crate) pointcut: Option<Pointcut>,
    pub(crate) advice: Vec<AdviceRule>,
    pub(crate) settings: BTreeMap<String, Value>,
}

impl AspectRule {
    #[must_use]
    pub fn builder(id: &str) -> AspectRuleBuilder {
        AspectRuleBuilder {
            id: id.to_owned(),
            order: i32::MAX,
            scope: JoinpointScope::default(),
            target_type: TargetType::default(),
            route_only: false,
            isolated: false,
            disabled: false,
            pointcut: None,
            advice: Vec::new(),
            settings: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.state.id
    }

    #[must_use]
    pub fn order(&self) -> i32 {
        self.order
    }

    #[must_use]
    pub fn scope(&self) -> JoinpointScope {
        self.scope
    }

    #[must_use]
    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    /// Restricted to route-level weaving; never applied to components.
    #[must_use]
    pub fn is_route_only(&self) -> bool {
        self.route_only
    }

    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.state.isolated
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.state.disabled.load(Ordering::Acquire)
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.state.disabled.store(disabled, Ordering::Release);
    }

    #[must_use]
    pub fn pointcut(&self) -> Option<&Pointcut> {
        self.pointcut.as_ref()
    }

    #[must_use]
    pub fn advice(&self) -> &[AdviceRule] {
        &self.advice
    }

    #[must_use]
    pub fn settings(&self) -> &BTreeMap<String, Value> {
        &self.settings
    }

    /// Whether this rule may contribute advice to component weaving.
    #[must_use]
    pub fn weaves_components(&self) -> bool {
        self.target_type == TargetType::Route && !self.route_only
    }
}

/// Builder for an [`AspectRule`].
///
/// ```
/// use weft::{AspectRule, Pointcut};
///
/// let rule = AspectRule::builder("audit")
///     .order(10)
///     .pointcut(Pointcut::builder().include("/orders/**").build().unwrap())
///     .before(|_| Ok(None))
///     .finally(|_| Ok(None))
///     .build()
///     .unwrap();
/// assert_eq!(rule.advice().len(), 2);
/// ```
pub struct AspectRuleBuilder {
    id: String,
    order: i32,
    scope: JoinpointScope,
    target_type: TargetType,
    route_only: bool,
    isolated: bool,
    disabled: bool,
    pointcut: Option<Result<Pointcut, ConfigError>>,
    advice: Vec<(AdviceType, Arc<dyn AdviceAction>)>,
    settings: BTreeMap<String, Value>,
}

impl AspectRuleBuilder {
    /// Lower orders are assembled first. Defaults to `i32::MAX`.
    #[must_use]
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: JoinpointScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn target_type(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    #[must_use]
    pub fn route_only(mut self, route_only: bool) -> Self {
        self.route_only = route_only;
        self
    }

    /// Log and swallow failures of this aspect's advice.
    #[must_use]
    pub fn isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn pointcut(mut self, pointcut: Pointcut) -> Self {
        self.pointcut = Some(Ok(pointcut));
        self
    }

    /// Set the pointcut from text. Errors surface in [`AspectRuleBuilder::build`].
    #[must_use]
    pub fn pointcut_text(mut self, text: &str) -> Self {
        self.pointcut = Some(Pointcut::parse(text));
        self
    }

    /// Add an advice body implemented as an [`AdviceAction`] type.
    #[must_use]
    pub fn advice_with(mut self, advice_type: AdviceType, action: impl AdviceAction + 'static) -> Self {
        self.advice.push((advice_type, Arc::new(action)));
        self
    }

    #[must_use]
    pub fn advice<F>(self, advice_type: AdviceType, action: F) -> Self
    where
        F: Fn(&Activity) -> Result<Option<Value>, AdviceError> + Send + Sync + 'static,
    {
        self.advice_with(advice_type, action)
    }

    #[must_use]
    pub fn before<F>(self, action: F) -> Self
    where
        F: Fn(&Activity) -> Result<Option<Value>, AdviceError> + Send + Sync + 'static,
    {
        self.advice(AdviceType::Before, action)
    }

    #[must_use]
    pub fn after<F>(self, action: F) -> Self
    where
        F: Fn(&Activity) -> Result<Option<Value>, AdviceError> + Send + Sync + 'static,
    {
        self.advice(AdviceType::After, action)
    }

    #[must_use]
    pub fn around<F>(self, action: F) -> Self
    where
        F: Fn(&Activity) -> Result<Option<Value>, AdviceError> + Send + Sync + 'static,
    {
        self.advice(AdviceType::Around, action)
    }

    #[must_use]
    pub fn finally<F>(self, action: F) -> Self
    where
        F: Fn(&Activity) -> Result<Option<Value>, AdviceError> + Send + Sync + 'static,
    {
        self.advice(AdviceType::Finally, action)
    }

    #[must_use]
    pub fn on_exception<F>(self, action: F) -> Self
    where
        F: Fn(&Activity) -> Result<Option<Value>, AdviceError> + Send + Sync + 'static,
    {
        self.advice(AdviceType::Exception, action)
    }

    /// Add a setting published on the activity before advice runs.
    #[must_use]
    pub fn setting(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.settings.insert(name.to_owned(), value.into());
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAspectId`] for a blank id, or the
    /// pointcut's own error if it failed to parse.
    pub fn build(self) -> Result<AspectRule, ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::EmptyAspectId);
        }
        let pointcut = self.pointcut.transpose()?;
        let state = Arc::new(AspectState {
            id: self.id,
            isolated: self.isolated,
            disabled: AtomicBool::new(self.disabled),
        });
        let advice = self
            .advice
            .into_iter()
            .map(|(advice_type, action)| AdviceRule {
                aspect: Arc::clone(&state),
                advice_type,
                action,
            })
            .collect();
        Ok(AspectRule {
            state,
            order: self.order,
            scope: self.scope,
            target_type: self.target_type,
            route_only: self.route_only,
            pointcut,
            advice,
            settings: self.settings,
        })
    }
}

impl fmt::Debug for AspectRuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectRuleBuilder")
            .field("id", &self.id)
            .field("order", &self.order)
            .field("advice", &self.advice.len())
            .finish_non_exhaustive()
    }
}
