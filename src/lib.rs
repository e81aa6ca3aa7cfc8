mod assemble;
mod cache;
mod error;
mod intercept;
pub mod pattern;
mod types;
mod weaver;

pub use cache::{AdviceResolutionCache, CacheStats};
pub use error::{AdviceError, InvokeError};
pub use pattern::{ParseError, PatternError};
pub use types::{
    Activity, ActivityGuard, AdviceAction, AdviceRule, AdviceSet, AdviceType, AspectRule,
    AspectRuleBuilder, AspectRuleStore, COMPONENT_SEPARATOR, ConfigError, ErrorOrigin,
    IncludeExcludePatterns, JoinPointKey, JoinpointScope, Outcome, Pointcut, PointcutBuilder,
    PointcutKind, PointcutPattern, ROUTE_SEPARATOR, RaisedError, TargetType, Value,
    WildcardPattern,
};
pub use weaver::{Proxied, Weaver, WeaverBuilder};
