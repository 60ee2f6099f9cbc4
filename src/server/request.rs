//! Raw request parsing into a dispatch context.

use std::io::Read;

use http::Method;
use may_minihttp::Request;
use tracing::debug;

use crate::context::{Context, HeaderVec};

/// Extract method, path, headers, and body from a `may_minihttp::Request`
/// and build the per-request [`Context`]. Query parsing happens inside the
/// context constructor.
pub(crate) fn read_context(req: Request) -> Context {
    let method = req.method().parse::<Method>().unwrap_or(Method::GET);
    let raw_path = req.path().to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let mut body = Vec::new();
    if req.body().read_to_end(&mut body).is_err() {
        debug!(method = %method, path = %raw_path, "Failed to read request body");
        body.clear();
    }

    debug!(
        method = %method,
        path = %raw_path,
        header_count = headers.len(),
        body_bytes = body.len(),
        "HTTP request parsed"
    );

    Context::new(method, &raw_path)
        .with_headers(headers)
        .with_body(body)
}
