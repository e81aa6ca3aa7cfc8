use weft::{COMPONENT_SEPARATOR, ROUTE_SEPARATOR, WildcardPattern};

fn main() {
    let routes = WildcardPattern::compile("/static/**", Some(ROUTE_SEPARATOR))
        .expect("failed to compile route pattern");
    let components = WildcardPattern::compile("com.example.**", Some(COMPONENT_SEPARATOR))
        .expect("failed to compile component pattern");

    println!("{routes} (weight {:.1})", routes.weight());
    for path in ["/static/css/site.css", "/static/", "/api/orders"] {
        match routes.mask(path) {
            Some(masked) => println!("  {path} -> {masked}"),
            None => println!("  {path} -> no match"),
        }
    }

    println!("{components} (weight {:.1})", components.weight());
    for id in ["com.example.orders.OrderService", "org.other.Thing"] {
        match components.mask(id) {
            Some(masked) => println!("  {id} -> {masked}"),
            None => println!("  {id} -> no match"),
        }
    }
}
