use weft::pattern;
use weft::{AspectRule, ConfigError, Pointcut, PointcutKind};

#[test]
fn parse_multi_line_text() {
    let text = r"
# order endpoints, except reads
+ /orders/**@orderService
- ^get*
+ @auditService^record
";
    let pc = Pointcut::parse(text).unwrap();
    assert_eq!(pc.includes().len(), 2);
    assert_eq!(pc.excludes().len(), 1);
    assert_eq!(pc.includes()[0].to_string(), "/orders/**@orderService");
    assert_eq!(pc.excludes()[0].to_string(), "^get*");

    assert!(pc.matches(Some("/orders/7"), Some("orderService"), Some("delete")));
    assert!(!pc.matches(Some("/orders/7"), Some("orderService"), Some("getOne")));
    assert!(pc.matches(Some("/anything"), Some("auditService"), Some("record")));
    assert!(!pc.matches(Some("/users/7"), Some("orderService"), Some("delete")));
}

#[test]
fn raw_entries_keep_signs_and_parts() {
    let entries = pattern::parse("+ /a@b^c\n-  @x\n").unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].include);
    assert_eq!(entries[0].triple.route.as_deref(), Some("/a"));
    assert_eq!(entries[0].triple.component.as_deref(), Some("b"));
    assert_eq!(entries[0].triple.operation.as_deref(), Some("c"));
    assert!(!entries[1].include);
    assert_eq!(entries[1].triple.route, None);
    assert_eq!(entries[1].triple.component.as_deref(), Some("x"));
}

#[test]
fn empty_text_has_no_entries() {
    assert!(pattern::parse("").unwrap().is_empty());
    assert!(pattern::parse("  \n# only a comment\n").unwrap().is_empty());
    let pc = Pointcut::parse("").unwrap();
    assert!(!pc.matches(Some("/a"), Some("b"), Some("c")));
}

#[test]
fn malformed_text_is_rejected() {
    for bad in ["/orders/**", "+\n", "* /a", "+ @"] {
        let err = Pointcut::parse(bad).unwrap_err();
        assert!(
            matches!(err, ConfigError::Parse(_)),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn bad_wildcard_reports_pattern() {
    let err = Pointcut::parse("+ /a/***").unwrap_err();
    match err {
        ConfigError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "/a/***"),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn regex_kind() {
    let pc = Pointcut::parse_as(PointcutKind::Regex, "+ /orders/\\d+@order\\w+").unwrap();
    assert_eq!(pc.kind(), PointcutKind::Regex);
    assert!(pc.matches(Some("/orders/42"), Some("orderService"), None));
    assert!(!pc.matches(Some("/orders/x"), Some("orderService"), None));

    let err = Pointcut::parse_as(PointcutKind::Regex, "+ @order(").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRegex { .. }));
}

#[test]
fn ignore_case_wildcards() {
    let pc = Pointcut::builder()
        .ignore_case(true)
        .include("/Orders/**@OrderService")
        .build()
        .unwrap();
    assert!(pc.matches(Some("/orders/1"), Some("orderservice"), None));
}

#[test]
fn aspect_rule_with_pointcut_text() {
    let rule = AspectRule::builder("audit")
        .pointcut_text("+ /orders/**\n- ^get*")
        .before(|_| Ok(None))
        .build()
        .unwrap();
    let pc = rule.pointcut().unwrap();
    assert!(pc.matches(Some("/orders/1"), Some("svc"), Some("delete")));
    assert!(!pc.matches(Some("/orders/1"), Some("svc"), Some("getAll")));

    let err = AspectRule::builder("broken")
        .pointcut_text("orders")
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
