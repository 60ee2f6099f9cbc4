//! Built-in middleware constructors.
//!
//! These are ordinary chain entries built on the public `Context` API; the
//! chain mechanism itself lives in [`crate::context`]. Each constructor
//! returns a closure suitable for [`crate::Engine::use_middleware`].

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use serde_json::json;
use tracing::{error, info};

use crate::context::Context;

/// Request logging middleware.
///
/// Wraps the rest of the chain and emits one structured event per request
/// with method, path, final status, and latency.
pub fn logger() -> impl Fn(&mut Context) + Send + Sync + 'static {
    |ctx: &mut Context| {
        let start = Instant::now();
        let method = ctx.method().clone();
        let path = ctx.path().to_string();
        ctx.next();
        info!(
            method = %method,
            path = %path,
            status = ctx.status_code(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request complete"
        );
    }
}

/// Panic recovery middleware.
///
/// Catches a panic raised anywhere further in the chain and converts it into
/// a 500 JSON response. Position it before any middleware whose faults should
/// be contained; without it a panic propagates to the server boundary and the
/// in-flight request is lost.
pub fn recovery() -> impl Fn(&mut Context) + Send + Sync + 'static {
    |ctx: &mut Context| {
        let result = catch_unwind(AssertUnwindSafe(|| ctx.next()));
        if let Err(panic) = result {
            error!(panic_message = %panic_message(&panic), "Handler panicked");
            ctx.json(500, &json!({ "error": "Internal Server Error" }));
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
