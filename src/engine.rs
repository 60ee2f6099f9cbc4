//! Engine and route groups.
//!
//! The engine owns the router and the loaded templates; groups are
//! short-lived views that compose a path prefix and a middleware list while
//! registering routes. A child group copies its parent's middleware list at
//! creation time, and the router snapshots a group's list at registration
//! time, so neither later `use_middleware` calls on the parent nor on the
//! group itself reach back into existing routes.
//!
//! All registration happens before [`Engine::run`]; the route table is
//! treated as read-only while serving.

use std::io;
use std::net::ToSocketAddrs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::Method;
use minijinja::Environment;

use crate::context::{Context, HandlerFunc};
use crate::error::EngineError;
use crate::router::Router;
use crate::server::{self, ServerHandle};
use crate::static_files::StaticFiles;
use crate::templates;

/// Top-level router owner and application entry point.
#[derive(Default)]
pub struct Engine {
    router: Router,
    /// Middleware applied to routes registered directly on the engine.
    root_middlewares: Vec<HandlerFunc>,
    templates: Option<Arc<Environment<'static>>>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Engine::default()
    }

    /// Append middleware for routes registered on the engine itself and for
    /// groups created from now on.
    pub fn use_middleware<F>(&mut self, middleware: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.root_middlewares.push(Arc::new(middleware));
    }

    /// Create a route group under `prefix`, inheriting a copy of the
    /// engine-level middleware registered so far.
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        RouteGroup {
            prefix: prefix.to_string(),
            middlewares: self.root_middlewares.clone(),
            engine: self,
        }
    }

    /// Register a route on the engine's root group.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.group("").add_route(method, pattern, handler);
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler);
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler);
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler);
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler);
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, handler);
    }

    pub fn head<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, pattern, handler);
    }

    pub fn options<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, pattern, handler);
    }

    /// Serve files under `dir` at `url/*filepath`.
    pub fn static_dir<P: Into<PathBuf>>(&mut self, url: &str, dir: P) {
        self.group("").static_dir(url, dir);
    }

    /// Load every file in `dir` as a template, keyed by file name, for use
    /// with [`Context::html`].
    pub fn load_templates(&mut self, dir: &Path) -> Result<(), EngineError> {
        self.templates = Some(Arc::new(templates::load_dir(dir)?));
        Ok(())
    }

    /// Dispatch one request through the router and its middleware chain.
    ///
    /// This is the per-request entry point used by the server layer and by
    /// tests. The context ends up carrying the buffered response, a 404 if
    /// nothing matched.
    pub fn handle(&self, ctx: &mut Context) {
        ctx.set_templates(self.templates.clone());
        self.router.handle(ctx);
    }

    /// Direct access to the underlying router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Start serving on `addr`. Registration must be complete by this point;
    /// the engine is shared read-only across request coroutines afterwards.
    pub fn run<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        server::serve(self, addr)
    }
}

/// A registration namespace with a path prefix and its own middleware list.
pub struct RouteGroup<'e> {
    engine: &'e mut Engine,
    prefix: String,
    middlewares: Vec<HandlerFunc>,
}

impl RouteGroup<'_> {
    /// Create a child group. The child's prefix is this group's prefix plus
    /// `prefix`, and its middleware list is a copy made now; later
    /// `use_middleware` calls on this group do not affect the child.
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        RouteGroup {
            prefix: format!("{}{}", self.prefix, prefix),
            middlewares: self.middlewares.clone(),
            engine: &mut *self.engine,
        }
    }

    /// Append middleware for routes registered on this group from now on.
    pub fn use_middleware<F>(&mut self, middleware: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Register `handler` for `method` at this group's prefix plus `pattern`.
    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        let full_pattern = format!("{}{}", self.prefix, pattern);
        self.engine
            .router
            .add_route(method, &full_pattern, Arc::new(handler), &self.middlewares);
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler);
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler);
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler);
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler);
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, handler);
    }

    pub fn head<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, pattern, handler);
    }

    pub fn options<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, pattern, handler);
    }

    /// Serve files under `dir` at this group's prefix plus `url/*filepath`.
    ///
    /// Missing files and traversal attempts answer 404.
    pub fn static_dir<P: Into<PathBuf>>(&mut self, url: &str, dir: P) {
        let files = StaticFiles::new(dir);
        let pattern = format!("{}/*filepath", url.trim_end_matches('/'));
        self.get(&pattern, move |ctx: &mut Context| {
            let file = ctx.param("filepath").unwrap_or_default().to_string();
            match files.load(&file) {
                Ok((bytes, content_type)) => {
                    ctx.set_header("Content-Type", content_type);
                    ctx.data(200, bytes);
                }
                Err(_) => {
                    let body = format!("404 NOT FOUND: {}", ctx.path());
                    ctx.string(404, &body);
                }
            }
        });
    }
}
