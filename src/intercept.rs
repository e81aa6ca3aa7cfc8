use std::fmt::Display;

use crate::{Activity, AdviceError, AdviceRule, AdviceSet, ErrorOrigin, InvokeError, Outcome};

/// Run `target` inside the advice chain of `set`.
///
/// States: BEFORE, INVOKE, AFTER, then EXCEPTION on any failure, and
/// FINALLY exactly once on every path. The activity's `ended` flag stops
/// all remaining non-finally advice.
pub(crate) fn intercept<R, E>(
    set: &AdviceSet,
    activity: &Activity,
    target: impl FnOnce() -> Result<R, E>,
) -> Result<Outcome<R>, InvokeError<E>>
where
    E: Display,
{
    if set.is_empty() {
        return target().map(Outcome::Returned).map_err(InvokeError::Target);
    }

    activity.merge_settings(set.settings());
    let outcome = match run_chain(set, activity, target) {
        Ok(outcome) => Ok(outcome),
        Err(err) => handle_failure(set, activity, err),
    };
    run_finally(set, activity);
    outcome
}

fn run_chain<R, E>(
    set: &AdviceSet,
    activity: &Activity,
    target: impl FnOnce() -> Result<R, E>,
) -> Result<Outcome<R>, InvokeError<E>> {
    if activity.is_ended() {
        tracing::trace!(route = activity.route(), "activity already ended; skipping to finally");
        return Ok(Outcome::Handled);
    }

    for advice in set.before() {
        run_advice(advice, activity)?;
        if activity.is_ended() {
            tracing::trace!(aspect = advice.aspect_id(), "short-circuit in before");
            return Ok(Outcome::Handled);
        }
    }

    let value = target().map_err(InvokeError::Target)?;

    for advice in set.after() {
        run_advice(advice, activity)?;
        if activity.is_ended() {
            tracing::trace!(aspect = advice.aspect_id(), "short-circuit in after");
            return Ok(Outcome::Returned(value));
        }
    }

    Ok(Outcome::Returned(value))
}

fn handle_failure<R, E: Display>(
    set: &AdviceSet,
    activity: &Activity,
    err: InvokeError<E>,
) -> Result<Outcome<R>, InvokeError<E>> {
    record(activity, &err);

    for advice in set.exception() {
        if activity.is_ended() {
            break;
        }
        run_advice(advice, activity)?;
    }

    if activity.is_ended() {
        tracing::trace!(route = activity.route(), "failure handled by exception advice");
        Ok(Outcome::Handled)
    } else {
        Err(err)
    }
}

fn run_finally(set: &AdviceSet, activity: &Activity) {
    for advice in set.finally() {
        if let Err(e) = execute(advice, activity) {
            tracing::warn!(
                aspect = advice.aspect_id(),
                error = %e,
                "finally advice failed"
            );
        }
    }
}

/// Execute one non-finally advice. Failures of isolated aspects are logged
/// and swallowed.
fn run_advice<E>(advice: &AdviceRule, activity: &Activity) -> Result<(), InvokeError<E>> {
    match execute(advice, activity) {
        Ok(()) => Ok(()),
        Err(e) if advice.is_isolated() => {
            tracing::error!(
                aspect = advice.aspect_id(),
                advice = %advice.advice_type(),
                error = %e,
                "isolated advice failed"
            );
            Ok(())
        }
        Err(source) => Err(InvokeError::Advice {
            aspect_id: advice.aspect_id().to_owned(),
            advice_type: advice.advice_type(),
            source,
        }),
    }
}

fn execute(advice: &AdviceRule, activity: &Activity) -> Result<(), AdviceError> {
    if advice.is_disabled() {
        tracing::trace!(aspect = advice.aspect_id(), "aspect disabled; advice skipped");
        return Ok(());
    }
    tracing::trace!(
        aspect = advice.aspect_id(),
        advice = %advice.advice_type(),
        "running advice"
    );
    if let Some(value) = advice.execute(activity)? {
        activity.record_result(advice.aspect_id(), advice.advice_type(), value);
    }
    Ok(())
}

fn record<E: Display>(activity: &Activity, err: &InvokeError<E>) {
    let (origin, type_name, message) = match err {
        InvokeError::Target(e) => (ErrorOrigin::Target, std::any::type_name::<E>(), e.to_string()),
        InvokeError::Advice {
            aspect_id,
            advice_type,
            source,
        } => (
            ErrorOrigin::Advice {
                aspect_id: aspect_id.clone(),
                advice_type: *advice_type,
            },
            std::any::type_name::<AdviceError>(),
            source.to_string(),
        ),
        InvokeError::NoActivity => return,
    };
    activity.raise(origin, type_name, message);
}
