//! HTTP serving on top of `may_minihttp`.
//!
//! Each inbound request runs on its own coroutine: the raw request is parsed
//! into a fresh [`Context`], dispatched through the engine, and the buffered
//! response is written back. A panic escaping the chain (no recovery
//! middleware installed) is caught here so a single request cannot take the
//! process down.

mod http_server;
mod request;
mod response;

use std::io;
use std::net::ToSocketAddrs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use may_minihttp::{HttpService, Request, Response};
use tracing::error;

use crate::engine::Engine;
use crate::middleware::panic_message;

pub use http_server::{HttpServer, ServerHandle};

#[derive(Clone)]
struct EngineService {
    engine: Arc<Engine>,
}

impl HttpService for EngineService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let mut ctx = request::read_context(req);
        let outcome = catch_unwind(AssertUnwindSafe(|| self.engine.handle(&mut ctx)));
        match outcome {
            Ok(()) => response::write_context(res, ctx),
            Err(panic) => {
                error!(
                    panic_message = %panic_message(&panic),
                    "Unrecovered panic during dispatch"
                );
                response::write_plain_error(res, 500, "Internal Server Error");
            }
        }
        Ok(())
    }
}

/// Start serving `engine` on `addr`.
pub(crate) fn serve<A: ToSocketAddrs>(engine: Engine, addr: A) -> io::Result<ServerHandle> {
    let service = EngineService {
        engine: Arc::new(engine),
    };
    HttpServer(service).start(addr)
}
