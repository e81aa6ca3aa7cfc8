#![allow(dead_code)]

use proptest::prelude::*;
use weft::{AdviceType, AspectRule, AspectRuleStore, Pointcut};

// --- Join point parts ---
// route     : "/" + 1..=4 lowercase segments joined by "/"
// component : 1..=3 lowercase segments joined by "."
// operation : one identifier, no separators

const OPERATIONS: &[&str] = &["get", "getAll", "list", "delete", "update", "create"];
const ADVICE_TYPES: &[AdviceType] = &[
    AdviceType::Before,
    AdviceType::After,
    AdviceType::Around,
    AdviceType::Finally,
    AdviceType::Exception,
];

pub fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z]{1,5}"
}

pub fn arb_route_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_segment(), 1..=4)
}

pub fn arb_route() -> impl Strategy<Value = String> {
    arb_route_segments().prop_map(|segments| format!("/{}", segments.join("/")))
}

pub fn arb_component() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_segment(), 1..=3).prop_map(|segments| segments.join("."))
}

pub fn arb_operation() -> impl Strategy<Value = String> {
    prop::sample::select(OPERATIONS).prop_map(str::to_owned)
}

pub fn arb_triple() -> impl Strategy<Value = (String, String, String)> {
    (arb_route(), arb_component(), arb_operation())
}

/// A route pattern derived from `segments`, each segment kept, replaced by
/// `*`, or widened with `**`. The result always matches the route the
/// segments came from.
pub fn arb_route_pattern_for(segments: Vec<String>) -> impl Strategy<Value = String> {
    let n = segments.len();
    prop::collection::vec(0_u8..4, n).prop_map(move |choices| {
        let parts: Vec<String> = segments
            .iter()
            .zip(choices)
            .map(|(segment, choice)| match choice {
                0 => "*".to_owned(),
                1 => "**".to_owned(),
                2 => format!("{}*", &segment[..1]),
                _ => segment.clone(),
            })
            .collect();
        format!("/{}", parts.join("/"))
    })
}

/// Any syntactically valid route pattern.
pub fn arb_route_pattern() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            arb_segment(),
            Just("*".to_owned()),
            Just("**".to_owned()),
            "[a-z]{1,3}".prop_map(|s| format!("{s}?")),
            "[a-z]{1,3}".prop_map(|s| format!("{s}*")),
        ],
        1..=4,
    )
    .prop_map(|parts| format!("/{}", parts.join("/")))
}

// --- Generated aspects ---

#[derive(Debug, Clone)]
pub struct GenAspect {
    pub id: String,
    pub order: Option<i32>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub advice: Vec<AdviceType>,
    pub setting: Option<(String, i64)>,
}

impl GenAspect {
    pub fn build(&self) -> AspectRule {
        let mut builder = AspectRule::builder(&self.id);
        if let Some(order) = self.order {
            builder = builder.order(order);
        }
        if self.include.is_some() || self.exclude.is_some() {
            let mut pc = Pointcut::builder();
            if let Some(include) = &self.include {
                pc = pc.include(include);
            }
            if let Some(exclude) = &self.exclude {
                pc = pc.exclude(exclude);
            }
            builder = builder.pointcut(pc.build().unwrap());
        }
        for advice_type in &self.advice {
            builder = builder.advice(*advice_type, |_| Ok(None));
        }
        if let Some((name, value)) = &self.setting {
            builder = builder.setting(name, *value);
        }
        builder.build().unwrap()
    }
}

fn arb_gen_aspect(index: usize) -> impl Strategy<Value = GenAspect> {
    (
        prop::option::of(-3_i32..3),
        prop::option::of(arb_route_pattern()),
        prop::option::of(arb_operation().prop_map(|op| format!("^{op}"))),
        prop::collection::vec(prop::sample::select(ADVICE_TYPES), 0..=3),
        prop::option::of((prop::sample::select(&["timeout", "retries"][..]), 0_i64..100)),
    )
        .prop_map(move |(order, include, exclude, advice, setting)| GenAspect {
            id: format!("aspect{index}"),
            order,
            include,
            exclude,
            advice,
            setting: setting.map(|(name, value)| (name.to_owned(), value)),
        })
}

/// 1..=6 aspects with unique ids, in registration order.
pub fn arb_aspects() -> impl Strategy<Value = Vec<GenAspect>> {
    (1_usize..=6).prop_flat_map(|n| (0..n).map(arb_gen_aspect).collect::<Vec<_>>())
}

pub fn store_of(aspects: &[GenAspect]) -> AspectRuleStore {
    let mut store = AspectRuleStore::new();
    for aspect in aspects {
        store.register(aspect.build()).unwrap();
    }
    store
}
