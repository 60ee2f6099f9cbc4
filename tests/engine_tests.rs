use std::sync::Arc;

use http::Method;
use parking_lot::Mutex;
use trellis::{Context, Engine};

fn dispatch(app: &Engine, method: Method, path: &str) -> Context {
    let mut ctx = Context::new(method, path);
    app.handle(&mut ctx);
    ctx
}

#[test]
fn unmatched_request_gets_a_404_response() {
    let mut app = Engine::new();
    app.get("/known", |ctx: &mut Context| ctx.string(200, "ok"));

    let ctx = dispatch(&app, Method::GET, "/unknown");
    assert_eq!(ctx.status_code(), 404);
    assert!(String::from_utf8_lossy(ctx.body()).contains("404 NOT FOUND"));
}

#[test]
fn method_mismatch_gets_a_404_response() {
    let mut app = Engine::new();
    app.get("/known", |ctx: &mut Context| ctx.string(200, "ok"));

    let ctx = dispatch(&app, Method::POST, "/known");
    assert_eq!(ctx.status_code(), 404);
}

#[test]
fn reregistration_binds_the_second_handler() {
    let mut app = Engine::new();
    app.get("/dup", |ctx: &mut Context| ctx.string(200, "first"));
    app.get("/dup", |ctx: &mut Context| ctx.string(200, "second"));
    assert_eq!(app.router().route_count(), 1);

    let ctx = dispatch(&app, Method::GET, "/dup");
    assert_eq!(ctx.body(), b"second");
}

#[test]
fn params_are_installed_on_the_context() {
    let mut app = Engine::new();
    app.get("/hello/:name", |ctx: &mut Context| {
        let body = format!("hello {}", ctx.param("name").unwrap_or_default());
        ctx.string(200, &body);
    });

    let ctx = dispatch(&app, Method::GET, "/hello/test");
    assert_eq!(ctx.body(), b"hello test");
    assert_eq!(ctx.param("name"), Some("test"));
    assert_eq!(ctx.param("missing"), None);
}

#[test]
fn middleware_added_after_registration_does_not_reach_existing_routes() {
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let mut app = Engine::new();

    app.get("/early", |ctx: &mut Context| ctx.string(200, "early"));
    let l = log.clone();
    app.use_middleware(move |ctx: &mut Context| {
        l.lock().push("M");
        ctx.next();
    });
    app.get("/late", |ctx: &mut Context| ctx.string(200, "late"));

    let _ = dispatch(&app, Method::GET, "/early");
    assert!(log.lock().is_empty());

    let _ = dispatch(&app, Method::GET, "/late");
    assert_eq!(*log.lock(), vec!["M"]);
}

#[test]
fn each_dispatch_uses_a_fresh_context() {
    let mut app = Engine::new();
    app.get("/a/:id", |ctx: &mut Context| {
        let body = ctx.param("id").unwrap_or_default().to_string();
        ctx.string(200, &body);
    });

    let first = dispatch(&app, Method::GET, "/a/1");
    let second = dispatch(&app, Method::GET, "/a/2");
    assert_eq!(first.body(), b"1");
    assert_eq!(second.body(), b"2");
}
