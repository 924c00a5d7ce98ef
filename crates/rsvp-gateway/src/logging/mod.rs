//! Centralized Logging Infrastructure
//!
//! Provides structured logging with:
//! - Trace IDs for request correlation (echoed as `x-correlation-id`)
//! - One entry and one exit line per request

mod trace_context;

pub use trace_context::{
    accept_correlation_id, generate_trace_id, RequestSpan, TraceContext, CORRELATION_HEADER,
};
