//! Router core - hot path for request routing.
//!
//! Owns one segment trie per HTTP method plus a route table keyed by the
//! (method, pattern) pair. Registration inserts into the trie and snapshots
//! the registering group's middleware list; lookup resolves a concrete path
//! to a pattern and extracts bound parameters.
//!
//! Routes are expected to be registered before serving begins. Lookups do
//! not lock; the no-concurrent-writer precondition is the caller's contract.

use std::collections::HashMap;

use http::Method;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::trie::Node;
use crate::context::{Context, HandlerFunc};

/// Maximum number of path/query parameters before heap allocation.
/// Most routes bind no more than a handful of segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
pub type ParamVec = SmallVec<[(String, String); MAX_INLINE_PARAMS]>;

/// Split a pattern or path into its non-empty segments.
///
/// Leading, trailing, and doubled slashes produce empty items which are
/// dropped. Parsing stops right after the first wildcard segment; any text
/// following it is discarded, so `/p/*name/*` yields `["p", "*name"]`.
pub(crate) fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/') {
        if item.is_empty() {
            continue;
        }
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

/// Result of matching a concrete path against the registered routes.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The registered pattern that matched (e.g. `/hello/:name`).
    pub pattern: String,
    /// Parameters bound while matching, in pattern order.
    pub params: ParamVec,
}

impl RouteMatch {
    /// Look up a bound parameter by name.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    method: Method,
    pattern: String,
}

struct RouteEntry {
    handler: HandlerFunc,
    /// Middleware list of the owning group, copied at registration time.
    middlewares: Vec<HandlerFunc>,
}

/// Maps an incoming method + path to a handler and its middleware chain.
#[derive(Default)]
pub struct Router {
    /// Per-method trie roots, created lazily on first registration.
    roots: HashMap<Method, Node>,
    table: HashMap<RouteKey, RouteEntry>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Router::default()
    }

    /// Register `handler` for `method` + `pattern`.
    ///
    /// `middlewares` is the registering group's list at this moment; the
    /// router keeps its own copy so later `use_middleware` calls do not
    /// affect routes that are already registered. Registering the same
    /// (method, pattern) pair again replaces the previous entry.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: HandlerFunc,
        middlewares: &[HandlerFunc],
    ) {
        let parts = parse_pattern(pattern);
        let root = self.roots.entry(method.clone()).or_insert_with(Node::root);
        root.insert(pattern, &parts, 0);

        let key = RouteKey {
            method: method.clone(),
            pattern: pattern.to_string(),
        };
        let entry = RouteEntry {
            handler,
            middlewares: middlewares.to_vec(),
        };
        if self.table.insert(key, entry).is_some() {
            warn!(
                method = %method,
                pattern = %pattern,
                "Route re-registered, previous handler replaced"
            );
        } else {
            info!(
                method = %method,
                pattern = %pattern,
                middleware_count = middlewares.len(),
                "Route registered"
            );
        }
    }

    /// Number of registered (method, pattern) entries.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    /// Match `path` against the routes registered for `method`.
    ///
    /// On a hit, parameters are extracted by walking the matched pattern's
    /// segments alongside the path's segments: `:name` binds one segment,
    /// `*name` binds the remainder joined with `/` (a bare `*` binds
    /// nothing), and extraction stops at the first wildcard.
    #[must_use]
    pub fn get_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let root = self.roots.get(method)?;
        let search_parts = parse_pattern(path);
        let node = root.search(&search_parts, 0)?;
        let pattern = node.pattern()?.to_string();

        let mut params = ParamVec::new();
        for (idx, part) in parse_pattern(&pattern).iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                let value = search_parts.get(idx).copied().unwrap_or_default();
                params.push((name.to_string(), value.to_string()));
            } else if let Some(name) = part.strip_prefix('*') {
                if !name.is_empty() {
                    let rest = search_parts.get(idx..).unwrap_or_default().join("/");
                    params.push((name.to_string(), rest));
                }
                break;
            }
        }

        debug!(
            method = %method,
            path = %path,
            pattern = %pattern,
            params = ?params,
            "Route matched"
        );
        Some(RouteMatch { pattern, params })
    }

    /// Dispatch the context's request through the matched route's chain.
    ///
    /// On a match the context receives the extracted parameters, a copy of
    /// the route's middleware chain, and the terminal handler, and the chain
    /// is started. On no match the router writes a 404 response itself; a
    /// missing route is not an error that propagates to the caller.
    pub(crate) fn handle(&self, ctx: &mut Context) {
        let matched = self.get_route(ctx.method(), ctx.path());
        match matched {
            Some(m) => {
                let key = RouteKey {
                    method: ctx.method().clone(),
                    pattern: m.pattern,
                };
                if let Some(entry) = self.table.get(&key) {
                    ctx.install_route(m.params, entry.middlewares.clone(), entry.handler.clone());
                    ctx.next();
                } else {
                    // trie hit without a table entry cannot happen through
                    // add_route; treat it as not found
                    let body = format!("404 NOT FOUND: {}", ctx.path());
                    ctx.string(404, &body);
                }
            }
            None => {
                warn!(method = %ctx.method(), path = ctx.path(), "No route matched");
                let body = format!("404 NOT FOUND: {}", ctx.path());
                ctx.string(404, &body);
            }
        }
    }
}
