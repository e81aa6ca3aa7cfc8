mod activity;
mod advice_set;
mod aspect;
mod error;
mod join_point;
mod outcome;
mod plural;
mod pointcut;
mod store;
mod value;
pub(crate) mod wildcard;

pub use activity::{Activity, ActivityGuard, ErrorOrigin, RaisedError};
pub use advice_set::AdviceSet;
pub use aspect::{
    AdviceAction, AdviceRule, AdviceType, AspectRule, AspectRuleBuilder, JoinpointScope,
    TargetType,
};
pub use error::ConfigError;
pub use join_point::JoinPointKey;
pub use outcome::Outcome;
pub use plural::IncludeExcludePatterns;
pub use pointcut::{Pointcut, PointcutBuilder, PointcutKind, PointcutPattern};
pub use store::AspectRuleStore;
pub use value::Value;
pub use wildcard::{COMPONENT_SEPARATOR, ROUTE_SEPARATOR, WildcardPattern};
