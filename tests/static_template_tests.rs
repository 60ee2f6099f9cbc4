use std::fs;
use std::io::Write as _;

use http::Method;
use trellis::{Context, Engine};

fn dispatch(app: &Engine, method: Method, path: &str) -> Context {
    let mut ctx = Context::new(method, path);
    app.handle(&mut ctx);
    ctx
}

#[test]
fn static_dir_serves_files_under_its_prefix() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("css")).unwrap();
    let mut f = fs::File::create(dir.path().join("css/site.css")).unwrap();
    write!(f, "body {{ margin: 0 }}").unwrap();

    let mut app = Engine::new();
    app.static_dir("/assets", dir.path());

    let ctx = dispatch(&app, Method::GET, "/assets/css/site.css");
    assert_eq!(ctx.status_code(), 200);
    assert_eq!(ctx.response_header("Content-Type"), Some("text/css"));
    assert_eq!(ctx.body(), b"body { margin: 0 }");
}

#[test]
fn static_dir_missing_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Engine::new();
    app.static_dir("/assets", dir.path());

    let ctx = dispatch(&app, Method::GET, "/assets/nope.js");
    assert_eq!(ctx.status_code(), 404);
}

#[test]
fn static_dir_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let secret_dir = tempfile::tempdir().unwrap();
    let mut f = fs::File::create(secret_dir.path().join("secret.txt")).unwrap();
    write!(f, "secret").unwrap();

    let mut app = Engine::new();
    app.static_dir("/assets", dir.path());

    let path = format!(
        "/assets/../{}/secret.txt",
        secret_dir.path().file_name().unwrap().to_str().unwrap()
    );
    let ctx = dispatch(&app, Method::GET, &path);
    assert_eq!(ctx.status_code(), 404);
}

#[test]
fn html_renders_a_loaded_template() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = fs::File::create(dir.path().join("greet.html")).unwrap();
    write!(f, "<p>Hello {{{{ name }}}}</p>").unwrap();

    let mut app = Engine::new();
    app.load_templates(dir.path()).unwrap();
    app.get("/greet/:name", |ctx: &mut Context| {
        let name = ctx.param("name").unwrap_or_default().to_string();
        ctx.html(200, "greet.html", &serde_json::json!({ "name": name }));
    });

    let ctx = dispatch(&app, Method::GET, "/greet/world");
    assert_eq!(ctx.status_code(), 200);
    assert_eq!(ctx.response_header("Content-Type"), Some("text/html"));
    assert_eq!(ctx.body(), b"<p>Hello world</p>");
}

#[test]
fn html_with_unknown_template_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Engine::new();
    app.load_templates(dir.path()).unwrap();
    app.get("/page", |ctx: &mut Context| {
        ctx.html(200, "missing.html", &serde_json::json!({}));
    });

    let ctx = dispatch(&app, Method::GET, "/page");
    assert_eq!(ctx.status_code(), 500);
}

#[test]
fn load_templates_missing_dir_is_an_error() {
    let mut app = Engine::new();
    assert!(app
        .load_templates(std::path::Path::new("/nonexistent/trellis"))
        .is_err());
}
