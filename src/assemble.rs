use crate::{AdviceSet, AdviceType, AspectRule, JoinpointScope};

pub(crate) fn assemble(
    rules: &[AspectRule],
    scope: Option<JoinpointScope>,
    route: Option<&str>,
    component: Option<&str>,
    operation: Option<&str>,
) -> AdviceSet {
    let mut set = AdviceSet::default();

    for rule in ordered(rules) {
        if !rule.weaves_components() || !scope_eligible(scope, rule.scope()) {
            continue;
        }
        let matched = rule
            .pointcut()
            .is_none_or(|pc| pc.matches(route, component, operation));
        if !matched {
            continue;
        }

        for advice in rule.advice() {
            match advice.advice_type() {
                AdviceType::Before => set.before.push(advice.clone()),
                AdviceType::After => set.after.push(advice.clone()),
                AdviceType::Around => {
                    set.before.push(advice.clone());
                    set.after.push(advice.clone());
                }
                AdviceType::Finally => set.finally.push(advice.clone()),
                AdviceType::Exception => set.exception.push(advice.clone()),
            }
        }
        for (name, value) in rule.settings() {
            set.settings
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        set.aspect_count += 1;
    }

    set
}

/// Ascending by `order`; ties keep registration order.
fn ordered(rules: &[AspectRule]) -> Vec<&AspectRule> {
    let mut sorted: Vec<&AspectRule> = rules.iter().collect();
    sorted.sort_by_key(|r| r.order());
    sorted
}

fn scope_eligible(requested: Option<JoinpointScope>, own: JoinpointScope) -> bool {
    match requested {
        None | Some(JoinpointScope::Route | JoinpointScope::Component) => true,
        Some(requested) => own == requested,
    }
}
