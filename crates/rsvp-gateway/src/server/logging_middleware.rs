//! HTTP Request/Response Logging Middleware
//!
//! Centralized logging with trace IDs for request correlation.
//! Uses TraceContext for consistent, non-repetitive logging.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, warn, Instrument};

use super::error::envelope_response;
use crate::logging::{RequestSpan, TraceContext, CORRELATION_HEADER};

/// Largest body logged verbatim at DEBUG
const MAX_BODY_LOG_SIZE: usize = 1000;

/// Largest request body the gateway will buffer
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024;

/// Format bytes as string - compact version
pub fn format_body(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "[empty]".to_string();
    }

    if bytes.len() > MAX_BODY_LOG_SIZE {
        return format!("[{} bytes]", bytes.len());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => {
            // Compact JSON
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
                return serde_json::to_string(&json).unwrap_or_else(|_| text.to_string());
            }
            if text.len() > 200 {
                let cut = (0..=200).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
                format!("{}...", &text[..cut])
            } else {
                text.to_string()
            }
        }
        Err(_) => format!("[binary: {} bytes]", bytes.len()),
    }
}

/// Logging middleware for requests and responses
///
/// Establishes the request's TraceContext (available to handlers as an
/// extension), logs a single entry/exit line and echoes the correlation ID.
/// Request bodies over [`MAX_REQUEST_BODY_SIZE`] are refused with 413 before
/// any handler runs.
pub async fn http_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let caller_id = request
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let ctx = TraceContext::new(&method, &path).with_correlation_id(caller_id.as_deref());
    let span = RequestSpan::enter(&ctx);

    async move {
        RequestSpan::log_entry(&ctx);

        let mut response = match read_request(request, &ctx).await {
            Ok(request) => relay_response(next.run(request).await, &ctx).await,
            Err(rejection) => rejection,
        };

        if let Ok(value) = HeaderValue::from_str(&ctx.trace_id) {
            response.headers_mut().insert(CORRELATION_HEADER, value);
        }

        RequestSpan::log_exit(&ctx, response.status().as_u16(), None);
        response
    }
    .instrument(span)
    .await
}

/// Buffer the request body (bounded), log it and hand the request back
async fn read_request(request: Request, ctx: &TraceContext) -> Result<Request, Response> {
    let (mut parts, body) = request.into_parts();
    let body_bytes = match Limited::new(body, MAX_REQUEST_BODY_SIZE).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            warn!(
                trace_id = %ctx.trace_id,
                limit = MAX_REQUEST_BODY_SIZE,
                "Request body too large"
            );
            return Err(envelope_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                format!("request body exceeds {} bytes", MAX_REQUEST_BODY_SIZE),
                &ctx.trace_id,
            ));
        }
        Err(e) => {
            warn!(trace_id = %ctx.trace_id, "Failed to read request body: {}", e);
            return Err(envelope_response(
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                "request body could not be read",
                &ctx.trace_id,
            ));
        }
    };

    if !body_bytes.is_empty() {
        debug!(trace_id = %ctx.trace_id, body = %format_body(&body_bytes), "Request body");
    }

    parts.extensions.insert(ctx.clone());
    Ok(Request::from_parts(parts, Body::from(body_bytes)))
}

async fn relay_response(response: Response, ctx: &TraceContext) -> Response {
    let (parts, body) = response.into_parts();
    let body_bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(trace_id = %ctx.trace_id, "Failed to read response body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !body_bytes.is_empty() {
        debug!(trace_id = %ctx.trace_id, body = %format_body(&body_bytes), "Response body");
    }

    Response::from_parts(parts, Body::from(body_bytes))
}
