//! Per-request dispatch context.
//!
//! One `Context` is created for each inbound request and dropped when the
//! response has been written; it is never shared between requests. It carries
//! the parsed request, the parameters bound by the router, the resolved
//! middleware chain plus terminal handler, and a buffered response that the
//! server layer flushes once the chain returns.
//!
//! Chain execution follows the onion model: `next` advances a cursor and
//! invokes the entry there, and each middleware decides whether to call
//! `next` itself. Code before that inner call runs on the way in, code after
//! it on the way out. A middleware that never calls `next` short-circuits
//! everything further in, handler included.

use std::sync::Arc;

use http::Method;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::error;

use crate::router::ParamVec;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
pub type HeaderVec = SmallVec<[(String, String); MAX_INLINE_HEADERS]>;

/// A middleware or terminal handler entry in a request chain.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Per-request state threaded through the middleware chain.
pub struct Context {
    method: Method,
    path: String,
    query_params: ParamVec,
    req_headers: HeaderVec,
    req_body: Vec<u8>,

    params: ParamVec,

    status: u16,
    resp_headers: HeaderVec,
    body: Vec<u8>,

    handler: Option<HandlerFunc>,
    middlewares: Vec<HandlerFunc>,
    /// Chain position: 0..=len(middlewares) is pending, len+1 is done.
    cursor: usize,

    templates: Option<Arc<minijinja::Environment<'static>>>,
}

impl Context {
    /// Create a context for `method` and `raw_path`.
    ///
    /// `raw_path` may carry a query string; it is split off and parsed into
    /// the query parameter set.
    #[must_use]
    pub fn new(method: Method, raw_path: &str) -> Self {
        let (path, query) = match raw_path.split_once('?') {
            Some((p, q)) => (p, q),
            None => (raw_path, ""),
        };
        let query_params: ParamVec = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Context {
            method,
            path: path.to_string(),
            query_params,
            req_headers: HeaderVec::new(),
            req_body: Vec::new(),
            params: ParamVec::new(),
            status: 200,
            resp_headers: HeaderVec::new(),
            body: Vec::new(),
            handler: None,
            middlewares: Vec::new(),
            cursor: 0,
            templates: None,
        }
    }

    /// Attach request headers (names are expected lowercased).
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderVec) -> Self {
        self.req_headers = headers;
        self
    }

    /// Attach the raw request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.req_body = body;
        self
    }

    // ---- request accessors -------------------------------------------------

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path parameter bound by the router, or `None` if the name is unset.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All parameters bound for this request, in pattern order.
    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }

    /// Query string parameter by name.
    #[inline]
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Request header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.req_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Form field from an urlencoded request body.
    #[must_use]
    pub fn post_form(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(&self.req_body)
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Raw request body bytes.
    #[must_use]
    pub fn request_body(&self) -> &[u8] {
        &self.req_body
    }

    // ---- chain execution ---------------------------------------------------

    /// Install the matched route into this context. Called by the router
    /// before the chain starts; the middleware list is this route's own copy.
    pub(crate) fn install_route(
        &mut self,
        params: ParamVec,
        middlewares: Vec<HandlerFunc>,
        handler: HandlerFunc,
    ) {
        self.params = params;
        self.middlewares = middlewares;
        self.handler = Some(handler);
        self.cursor = 0;
    }

    /// Advance the chain by one entry.
    ///
    /// While middleware entries remain the cursor moves past the current one
    /// before it is invoked, so the entry itself controls whether the rest of
    /// the chain runs by calling `next` (or not). Once all middleware has been
    /// consumed the terminal handler runs exactly once; further calls are
    /// no-ops.
    pub fn next(&mut self) {
        if self.cursor > self.middlewares.len() {
            return;
        }
        if self.cursor == self.middlewares.len() {
            self.cursor += 1;
            if let Some(handler) = self.handler.clone() {
                handler(self);
            }
            return;
        }
        self.cursor += 1;
        let mw = self.middlewares[self.cursor - 1].clone();
        mw(self);
    }

    pub(crate) fn set_templates(&mut self, templates: Option<Arc<minijinja::Environment<'static>>>) {
        self.templates = templates;
    }

    // ---- response helpers --------------------------------------------------

    /// Set the response status code.
    pub fn status(&mut self, code: u16) {
        self.status = code;
    }

    /// Add or replace a response header.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.resp_headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.resp_headers.push((name.to_string(), value.to_string()));
    }

    /// Plain text response.
    pub fn string(&mut self, status: u16, text: &str) {
        self.set_header("Content-Type", "text/plain");
        self.status = status;
        self.body = text.as_bytes().to_vec();
    }

    /// JSON response. A serialization failure is logged and converted into a
    /// 500 error response.
    pub fn json<T: Serialize>(&mut self, status: u16, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.set_header("Content-Type", "application/json");
                self.status = status;
                self.body = bytes;
            }
            Err(err) => {
                error!(error = %err, "Failed to serialize JSON response");
                self.error(500, "Internal Server Error");
            }
        }
    }

    /// Raw bytes response. Leaves any previously set Content-Type alone.
    pub fn data(&mut self, status: u16, bytes: Vec<u8>) {
        self.status = status;
        self.body = bytes;
    }

    /// Render a loaded template as an HTML response. Render failures become a
    /// 500 text response carrying the template error.
    pub fn html<T: Serialize>(&mut self, status: u16, name: &str, data: &T) {
        let Some(env) = self.templates.clone() else {
            error!(template = %name, "No templates loaded");
            self.error(500, "Internal Server Error");
            return;
        };
        let rendered = env
            .get_template(name)
            .and_then(|tmpl| tmpl.render(data));
        match rendered {
            Ok(html) => {
                self.set_header("Content-Type", "text/html");
                self.status = status;
                self.body = html.into_bytes();
            }
            Err(err) => {
                error!(template = %name, error = %err, "Template render failed");
                let message = err.to_string();
                self.string(500, &message);
            }
        }
    }

    /// Plain text error response.
    pub fn error(&mut self, status: u16, message: &str) {
        self.string(status, message);
    }

    // ---- response accessors ------------------------------------------------

    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Response header by name.
    #[must_use]
    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.resp_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Consume the context into (status, headers, body) for the server layer.
    #[must_use]
    pub fn into_response_parts(self) -> (u16, HeaderVec, Vec<u8>) {
        (self.status, self.resp_headers, self.body)
    }
}
