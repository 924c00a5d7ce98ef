//! Centralized branding constants
//!
//! All product naming and default endpoints come from this module.
//!
//! # Usage
//!
//! ```rust
//! use rsvp_core::branding;
//!
//! println!("App: {}", branding::DISPLAY_NAME);
//! let var = branding::env_var("PORT"); // "RSVP_PORT"
//! ```

/// Human-readable product name
pub const DISPLAY_NAME: &str = "RSVP";

/// Machine identifier (directories, database file, log prefix)
pub const IDENTIFIER: &str = "rsvp";

/// Prefix for every environment variable the gateway reads
pub const ENV_PREFIX: &str = "RSVP_";

/// Log file prefix for the rolling file appender
pub const LOG_PREFIX: &str = "rsvp";

/// Default port for the HTTP gateway
pub const DEFAULT_GATEWAY_PORT: u16 = 8085;

/// Default base URL of the store-directory service
pub const DEFAULT_DIRECTORY_URL: &str = "http://127.0.0.1:8081";

/// Default base URL of the reservation-policy service
pub const DEFAULT_POLICY_URL: &str = "http://127.0.0.1:8082";

/// Get the full environment variable name for a setting
///
/// # Example
/// ```ignore
/// let name = branding::env_var("DIRECTORY_URL");
/// // Returns: "RSVP_DIRECTORY_URL"
/// ```
pub fn env_var(name: &str) -> String {
    format!("{}{}", ENV_PREFIX, name)
}

/// User agent sent on outbound HTTP calls
pub fn user_agent() -> String {
    format!("{}/{}", DISPLAY_NAME, env!("CARGO_PKG_VERSION"))
}
