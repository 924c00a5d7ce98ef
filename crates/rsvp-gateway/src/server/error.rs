//! Error translation at the HTTP boundary
//!
//! Every failure leaves the gateway through [`error_response`] as
//! `{"error": {"code", "message", "correlationId"}}`.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use rsvp_core::{ErrorCode, ReservationError, ReservationResult};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::logging::{generate_trace_id, TraceContext};

/// Correlation ID of the current request, taken from its TraceContext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CorrelationId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<TraceContext>()
            .map(|ctx| ctx.trace_id.clone())
            .unwrap_or_else(generate_trace_id);
        Ok(Self(id))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// HTTP status for each error kind
pub fn status_for(error: &ReservationError) -> StatusCode {
    match error.code() {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::UnsupportedRole => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InvalidState => StatusCode::CONFLICT,
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::AmbiguousRole | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Translate a domain error into the wire envelope
///
/// Server-side failures are logged in full; the body only carries the
/// public message.
pub fn error_response(error: &ReservationError, correlation_id: &str) -> Response {
    let status = status_for(error);
    let code = error.code().as_str();

    if status.is_server_error() {
        error!(correlation_id, code, error = ?error, "[Gateway] Request failed");
    } else if status == StatusCode::FORBIDDEN {
        warn!(correlation_id, code, "[Gateway] {}", error);
    } else {
        info!(correlation_id, code, "[Gateway] {}", error);
    }

    envelope_response(status, code, error.public_message(), correlation_id)
}

/// Envelope for failures raised by the HTTP layer itself, before any handler runs
pub fn envelope_response(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    correlation_id: &str,
) -> Response {
    let body = ErrorEnvelope {
        error: ErrorBody {
            code,
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        },
    };

    (status, Json(body)).into_response()
}

/// A domain error bound to the request it failed
#[derive(Debug)]
pub struct ApiError {
    error: ReservationError,
    correlation_id: String,
}

impl ApiError {
    pub fn new(error: ReservationError, correlation: &CorrelationId) -> Self {
        Self {
            error,
            correlation_id: correlation.0.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(&self.error, &self.correlation_id)
    }
}

/// Attach the request's correlation ID to a domain result
pub trait Correlate<T> {
    fn correlate(self, correlation: &CorrelationId) -> Result<T, ApiError>;
}

impl<T> Correlate<T> for ReservationResult<T> {
    fn correlate(self, correlation: &CorrelationId) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(e, correlation))
    }
}
