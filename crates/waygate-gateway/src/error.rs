//! Mapping of dispatch failures onto HTTP responses.
//!
//! The dispatcher never converts a failed `Result` into a response itself;
//! a transport adapter sitting in front of [`ApiGateway`](crate::ApiGateway)
//! calls [`error_response`] when it has to answer the client anyway.

use serde_json::json;
use waygate_kernel::gateway::{GatewayError, GatewayResponse};

/// HTTP status and stable machine-readable code for `err`.
pub fn status_and_code(err: &GatewayError) -> (u16, &'static str) {
    match err {
        GatewayError::Backend(_) => (502, "BAD_GATEWAY"),
        GatewayError::Filter { .. } => (500, "FILTER_FAILED"),
        GatewayError::Panicked(_) => (500, "INTERNAL_ERROR"),
        _ => (500, "GATEWAY_MISCONFIGURED"),
    }
}

/// Render `err` as a JSON error response.
pub fn error_response(err: &GatewayError) -> GatewayResponse {
    let (status, code) = status_and_code(err);
    let body = json!({
        "error": {
            "code": code,
            "message": err.to_string(),
        }
    });

    GatewayResponse::new(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}
