use std::rc::Rc;

use weft::{Activity, AdviceError, AspectRule, JoinpointScope, Outcome, Pointcut, Value, Weaver};

#[derive(Debug)]
struct OrderService;

impl OrderService {
    fn delete(&self, id: u32) -> Result<String, String> {
        Ok(format!("order {id} deleted"))
    }

    fn list(&self) -> Result<Vec<u32>, String> {
        Ok(vec![1, 2, 3])
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let weaver = Weaver::builder()
        .aspect(
            AspectRule::builder("logging")
                .order(1)
                .pointcut(
                    Pointcut::parse("+ /orders/**@orderService")
                        .expect("failed to parse pointcut"),
                )
                .before(|activity| {
                    println!("  [logging] before {}", activity.route());
                    Ok(None)
                })
                .after(|activity| {
                    println!("  [logging] after {}", activity.route());
                    Ok(None)
                })
                .finally(|_| {
                    println!("  [logging] finally");
                    Ok(None)
                })
                .build()
                .expect("failed to build aspect"),
        )
        .aspect(
            AspectRule::builder("guard")
                .order(2)
                .pointcut(
                    Pointcut::builder()
                        .include("/orders/delete")
                        .build()
                        .expect("failed to build pointcut"),
                )
                .setting("role", "admin")
                .before(|activity| {
                    let role = activity.setting("role");
                    if role.as_ref().and_then(Value::as_str) == Some("admin") {
                        println!("  [guard] delete blocked");
                        activity.end();
                        Ok(None)
                    } else {
                        Err(AdviceError::new("role setting missing"))
                    }
                })
                .build()
                .expect("failed to build aspect"),
        )
        .build()
        .expect("failed to build weaver");

    let service = weaver.wrap(OrderService, "orderService");

    for route in ["/orders/list", "/orders/delete"] {
        println!("{route}:");
        let activity = Rc::new(Activity::new(route, JoinpointScope::Route));
        let _guard = Activity::bind(&activity);

        let result = if route.ends_with("delete") {
            service.call("delete", |svc| svc.delete(7))
        } else {
            service
                .call("list", OrderService::list)
                .map(|out| out.map(|ids| format!("{ids:?}")))
        };

        match result {
            Ok(Outcome::Returned(value)) => println!("  returned {value}"),
            Ok(Outcome::Handled) => println!("  handled by advice"),
            Err(e) => println!("  failed: {e}"),
        }
    }

    println!("cache: {:?}", weaver.cache_stats());
    weaver.destroy();
}
