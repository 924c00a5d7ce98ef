//! Domain error taxonomy
//!
//! Every service boundary translates these into a uniform envelope
//! (code, message, correlation id). Repositories and adapters keep using
//! `anyhow` internally; their failures surface here as `Internal`.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{ReservationStatus, Role};

/// Result type for domain operations
pub type ReservationResult<T> = Result<T, ReservationError>;

/// Errors surfaced by reservation operations
#[derive(Debug, Error)]
pub enum ReservationError {
    /// A referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The requester is not allowed to perform the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No strategy handles the requested role
    #[error("unsupported role: {0}")]
    UnsupportedRole(String),

    /// More than one strategy claims the same role (configuration error)
    #[error("role {0} is claimed by more than one strategy")]
    AmbiguousRole(Role),

    /// A dependency failed or timed out after the bounded retries
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The reservation's status does not allow the operation
    #[error("reservation {id} is {status}, cannot {action}")]
    InvalidState {
        id: Uuid,
        status: ReservationStatus,
        action: &'static str,
    },

    /// The request payload failed validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage or encoding failure; details are never shown to callers
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    Forbidden,
    UnsupportedRole,
    AmbiguousRole,
    UpstreamUnavailable,
    InvalidState,
    InvalidRequest,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::UnsupportedRole => "UNSUPPORTED_ROLE",
            Self::AmbiguousRole => "AMBIGUOUS_ROLE",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::InvalidState => "INVALID_STATE",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Internal => "INTERNAL",
        }
    }
}

impl ReservationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Forbidden(_) => ErrorCode::Forbidden,
            Self::UnsupportedRole(_) => ErrorCode::UnsupportedRole,
            Self::AmbiguousRole(_) => ErrorCode::AmbiguousRole,
            Self::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
            Self::InvalidState { .. } => ErrorCode::InvalidState,
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the caller caused this error (as opposed to us or a dependency)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Forbidden(_)
                | Self::UnsupportedRole(_)
                | Self::InvalidState { .. }
                | Self::InvalidRequest(_)
        )
    }

    /// Message safe to return to callers
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal error".to_string(),
            Self::AmbiguousRole(_) => "service misconfigured".to_string(),
            other => other.to_string(),
        }
    }
}
