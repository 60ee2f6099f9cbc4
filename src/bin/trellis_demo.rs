//! Demo service exercising routing, groups, middleware, templates, and
//! static files.
//!
//! ```text
//! cargo run --bin trellis-demo -- --addr 127.0.0.1:9999 \
//!     --static-dir ./static --template-dir ./templates
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trellis::{middleware, Context, Engine};

#[derive(Parser, Debug)]
#[command(name = "trellis-demo", about = "Trellis example service")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:9999", env = "TRELLIS_ADDR")]
    addr: String,
    /// Directory served at /assets
    #[arg(long)]
    static_dir: Option<PathBuf>,
    /// Directory of HTML templates
    #[arg(long)]
    template_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut app = Engine::new();
    app.use_middleware(middleware::logger());
    app.use_middleware(middleware::recovery());

    app.get("/hello", |ctx: &mut Context| {
        let name = ctx.query("name").unwrap_or("stranger").to_string();
        let body = format!("Hello {}, you're at {}\n", name, ctx.path());
        ctx.string(200, &body);
    });

    app.post("/login", |ctx: &mut Context| {
        let username = ctx.post_form("username").unwrap_or_default();
        ctx.json(200, &json!({ "username": username, "status": "ok" }));
    });

    app.get("/hello/:name", |ctx: &mut Context| {
        let body = format!(
            "hello {}, you're at {}\n",
            ctx.param("name").unwrap_or_default(),
            ctx.path()
        );
        ctx.string(200, &body);
    });

    let mut v1 = app.group("/v1");
    v1.get("/hello", |ctx: &mut Context| ctx.string(200, "This is v1 hello"));

    let mut v2 = app.group("/v2");
    v2.use_middleware(|ctx: &mut Context| {
        let start = Instant::now();
        ctx.next();
        info!(
            status = ctx.status_code(),
            path = ctx.path(),
            latency_us = start.elapsed().as_micros() as u64,
            "v2 group timing"
        );
    });
    v2.get("/hello/:name", |ctx: &mut Context| {
        let body = format!("hello {} from v2\n", ctx.param("name").unwrap_or_default());
        ctx.string(200, &body);
    });

    app.get("/panic", |_ctx: &mut Context| {
        panic!("deliberate demo panic");
    });

    if let Some(dir) = &args.template_dir {
        app.load_templates(dir)?;
        app.get("/students", |ctx: &mut Context| {
            ctx.html(
                200,
                "students.html",
                &json!({
                    "title": "trellis",
                    "students": [
                        { "name": "N1", "age": 10 },
                        { "name": "N2", "age": 11 },
                    ],
                }),
            );
        });
    }

    if let Some(dir) = &args.static_dir {
        app.static_dir("/assets", dir.clone());
    }

    info!(addr = %args.addr, "Starting server");
    let handle = app.run(&args.addr)?;
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("server coroutine panicked"))?;
    Ok(())
}
