use weft::{AspectRule, AspectRuleStore, JoinpointScope, Pointcut, Value, Weaver};

fn noop(id: &str) -> weft::AspectRuleBuilder {
    AspectRule::builder(id)
}

fn store(rules: Vec<AspectRule>) -> AspectRuleStore {
    let mut store = AspectRuleStore::new();
    for rule in rules {
        store.register(rule).unwrap();
    }
    store
}

#[test]
fn ordered_by_order_then_registration() {
    let s = store(vec![
        noop("late").order(20).before(|_| Ok(None)).build().unwrap(),
        noop("unordered").before(|_| Ok(None)).build().unwrap(),
        noop("early").order(1).before(|_| Ok(None)).build().unwrap(),
        noop("tie").order(20).before(|_| Ok(None)).build().unwrap(),
    ]);
    let set = s.assemble(None, Some("/a"), Some("c"), Some("op"));
    let ids: Vec<&str> = set.before().iter().map(|a| a.aspect_id()).collect();
    assert_eq!(ids, vec!["early", "late", "tie", "unordered"]);
}

#[test]
fn assembly_is_deterministic() {
    let build = || {
        store(vec![
            noop("b").order(5).after(|_| Ok(None)).build().unwrap(),
            noop("a").order(5).before(|_| Ok(None)).finally(|_| Ok(None)).build().unwrap(),
            noop("c")
                .pointcut(Pointcut::builder().include("/orders/**").build().unwrap())
                .on_exception(|_| Ok(None))
                .build()
                .unwrap(),
        ])
    };
    let first = build().assemble(None, Some("/orders/1"), Some("svc"), Some("get"));
    for _ in 0..5 {
        let again = build().assemble(None, Some("/orders/1"), Some("svc"), Some("get"));
        assert_eq!(first.summary(), again.summary());
        assert_eq!(first.aspect_count(), again.aspect_count());
    }
}

#[test]
fn settings_earlier_aspect_wins() {
    let s = store(vec![
        noop("second").order(2).setting("timeout", 30_i64).build().unwrap(),
        noop("first")
            .order(1)
            .setting("timeout", 5_i64)
            .setting("retries", 3_i64)
            .build()
            .unwrap(),
    ]);
    let set = s.assemble(None, None, None, None);
    assert_eq!(set.settings().get("timeout"), Some(&Value::Int(5)));
    assert_eq!(set.settings().get("retries"), Some(&Value::Int(3)));
    assert_eq!(set.aspect_count(), 2);
    assert!(!set.is_empty());
}

#[test]
fn scope_filters_aspects() {
    let s = store(vec![
        noop("route").before(|_| Ok(None)).build().unwrap(),
        noop("request")
            .scope(JoinpointScope::Request)
            .before(|_| Ok(None))
            .build()
            .unwrap(),
        noop("response")
            .scope(JoinpointScope::Response)
            .before(|_| Ok(None))
            .build()
            .unwrap(),
    ]);
    let ids = |scope| {
        s.assemble(scope, None, None, None)
            .before()
            .iter()
            .map(|a| a.aspect_id().to_owned())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(Some(JoinpointScope::Request)), vec!["request"]);
    assert_eq!(ids(Some(JoinpointScope::Response)), vec!["response"]);
    assert_eq!(ids(Some(JoinpointScope::Route)).len(), 3);
    assert_eq!(ids(None).len(), 3);
}

#[test]
fn route_scoped_aspect_skipped_for_narrower_scope() {
    let weaver = Weaver::builder()
        .aspect(noop("route").before(|_| Ok(None)).build().unwrap())
        .build()
        .unwrap();
    let narrow = weaver.resolve(Some(JoinpointScope::Request), Some("/r"), Some("c"), Some("op"));
    assert_eq!(narrow.aspect_count(), 0);
    let wide = weaver.resolve(Some(JoinpointScope::Route), Some("/r"), Some("c"), Some("op"));
    assert_eq!(wide.aspect_count(), 1);
}

#[test]
fn route_only_aspects_never_weave() {
    let s = store(vec![noop("r").route_only(true).before(|_| Ok(None)).build().unwrap()]);
    assert!(s.assemble(None, Some("/a"), Some("c"), Some("op")).is_empty());
}

#[test]
fn weaver_resolves_through_cache() {
    let weaver = Weaver::builder()
        .aspect(
            noop("orders")
                .pointcut(Pointcut::builder().include("/orders/**").build().unwrap())
                .before(|_| Ok(None))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let a = weaver.resolve(None, Some("/orders/1"), Some("svc"), Some("get"));
    let b = weaver.resolve(None, Some("/orders/1"), Some("svc"), Some("get"));
    let other = weaver.resolve(None, Some("/users/1"), Some("svc"), Some("get"));

    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(a.before().len(), 1);
    assert!(other.is_empty());
    let stats = weaver.cache_stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.builds, 2);
    assert_eq!(stats.hits, 1);
}

#[test]
fn duplicate_ids_rejected() {
    let err = Weaver::builder()
        .aspect(noop("dup").build().unwrap())
        .aspect(noop("dup").build().unwrap())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("dup"));
}
