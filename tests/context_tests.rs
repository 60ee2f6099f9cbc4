use http::Method;
use smallvec::smallvec;
use trellis::{Context, HeaderVec};

#[test]
fn query_string_is_split_off_the_path() {
    let ctx = Context::new(Method::GET, "/hello?name=trellis&lang=rust");
    assert_eq!(ctx.path(), "/hello");
    assert_eq!(ctx.query("name"), Some("trellis"));
    assert_eq!(ctx.query("lang"), Some("rust"));
    assert_eq!(ctx.query("missing"), None);
}

#[test]
fn query_values_are_percent_decoded() {
    let ctx = Context::new(Method::GET, "/search?q=a%20b%26c");
    assert_eq!(ctx.query("q"), Some("a b&c"));
}

#[test]
fn post_form_parses_an_urlencoded_body() {
    let ctx = Context::new(Method::POST, "/login")
        .with_body(b"username=alice&password=p%40ss".to_vec());
    assert_eq!(ctx.post_form("username"), Some("alice".to_string()));
    assert_eq!(ctx.post_form("password"), Some("p@ss".to_string()));
    assert_eq!(ctx.post_form("missing"), None);
}

#[test]
fn request_headers_match_case_insensitively() {
    let headers: HeaderVec = smallvec![
        ("content-type".to_string(), "application/json".to_string()),
        ("x-request-id".to_string(), "abc123".to_string()),
    ];
    let ctx = Context::new(Method::GET, "/").with_headers(headers);
    assert_eq!(ctx.header("Content-Type"), Some("application/json"));
    assert_eq!(ctx.header("X-REQUEST-ID"), Some("abc123"));
    assert_eq!(ctx.header("accept"), None);
}

#[test]
fn string_sets_text_plain() {
    let mut ctx = Context::new(Method::GET, "/");
    ctx.string(200, "hello");
    assert_eq!(ctx.status_code(), 200);
    assert_eq!(ctx.body(), b"hello");
    assert_eq!(ctx.response_header("Content-Type"), Some("text/plain"));
}

#[test]
fn json_sets_application_json() {
    let mut ctx = Context::new(Method::GET, "/");
    ctx.json(201, &serde_json::json!({ "id": 7 }));
    assert_eq!(ctx.status_code(), 201);
    assert_eq!(ctx.response_header("Content-Type"), Some("application/json"));
    let value: serde_json::Value = serde_json::from_slice(ctx.body()).unwrap();
    assert_eq!(value["id"], 7);
}

#[test]
fn data_leaves_content_type_untouched() {
    let mut ctx = Context::new(Method::GET, "/");
    ctx.set_header("Content-Type", "application/octet-stream");
    ctx.data(200, vec![0xde, 0xad]);
    assert_eq!(ctx.body(), &[0xde, 0xad]);
    assert_eq!(
        ctx.response_header("Content-Type"),
        Some("application/octet-stream")
    );
}

#[test]
fn set_header_replaces_an_existing_value() {
    let mut ctx = Context::new(Method::GET, "/");
    ctx.set_header("X-Version", "1");
    ctx.set_header("x-version", "2");
    assert_eq!(ctx.response_header("X-Version"), Some("2"));
    let (_, headers, _) = ctx.into_response_parts();
    assert_eq!(headers.len(), 1);
}

#[test]
fn html_without_loaded_templates_is_a_500() {
    let mut ctx = Context::new(Method::GET, "/");
    ctx.html(200, "index.html", &serde_json::json!({}));
    assert_eq!(ctx.status_code(), 500);
}

#[test]
fn default_response_is_200_with_empty_body() {
    let ctx = Context::new(Method::GET, "/");
    assert_eq!(ctx.status_code(), 200);
    assert!(ctx.body().is_empty());
}

#[test]
fn next_without_installed_route_is_a_noop() {
    let mut ctx = Context::new(Method::GET, "/");
    ctx.next();
    ctx.next();
    assert_eq!(ctx.status_code(), 200);
}
