//! # Trellis
//!
//! A small trie-based HTTP router and middleware framework running on the
//! `may` coroutine runtime.
//!
//! Routes are path templates made of static segments, `:name` parameters
//! (binding exactly one segment), and a trailing `*name` wildcard (binding
//! the rest of the path). Matching uses one prefix trie per HTTP method;
//! candidates at each level are tried in insertion order with backtracking,
//! so an exact static route beats a dynamic sibling.
//!
//! Handlers and middleware share one shape: a function over the per-request
//! [`Context`]. Middleware runs as an onion around the handler, each entry
//! calling [`Context::next`] to hand control inwards and regaining it on the
//! way back out. Route groups scope a path prefix and a middleware list;
//! child groups copy the parent's list at creation time, and every route
//! keeps the list that was in effect when it was registered.
//!
//! ## Example
//!
//! ```no_run
//! use trellis::{middleware, Engine};
//!
//! let mut app = Engine::new();
//! app.use_middleware(middleware::logger());
//!
//! app.get("/hello/:name", |ctx| {
//!     let greeting = format!("hello {}", ctx.param("name").unwrap_or("stranger"));
//!     ctx.string(200, &greeting);
//! });
//!
//! let mut v1 = app.group("/v1");
//! v1.get("/status", |ctx| ctx.json(200, &serde_json::json!({ "ok": true })));
//!
//! app.run("127.0.0.1:9999").unwrap().join().unwrap();
//! ```
//!
//! Registration is a setup-phase activity: all routes and middleware must be
//! in place before [`Engine::run`], after which the route table is shared
//! read-only across request coroutines.

pub mod context;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod static_files;
mod templates;

pub use context::{Context, HandlerFunc, HeaderVec, MAX_INLINE_HEADERS};
pub use engine::{Engine, RouteGroup};
pub use error::EngineError;
pub use router::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use server::ServerHandle;
pub use static_files::StaticFiles;
