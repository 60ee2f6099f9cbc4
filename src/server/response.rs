//! Buffered response flushing.

use may_minihttp::Response;

use crate::context::Context;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Write the context's buffered response into the wire response.
pub(crate) fn write_context(res: &mut Response, ctx: Context) {
    let (status, headers, body) = ctx.into_response_parts();
    res.status_code(status as usize, status_reason(status));
    for (name, value) in &headers {
        // may_minihttp only accepts 'static header lines
        let line = format!("{name}: {value}").into_boxed_str();
        res.header(Box::leak(line));
    }
    res.body_vec(body);
}

/// Write a bare text error without going through a context.
pub(crate) fn write_plain_error(res: &mut Response, status: u16, message: &str) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: text/plain");
    res.body_vec(message.as_bytes().to_vec());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reason_covers_common_codes() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
        assert_eq!(status_reason(299), "OK");
    }
}
