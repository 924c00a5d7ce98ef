//! Outbound collaborators
//!
//! Adapters for the external services this core depends on, plus the
//! timeout/retry wrapper every outbound call goes through.

mod policy_client;
mod store_directory;
mod upstream;

pub use policy_client::{HttpPolicySource, PolicySource};
pub use store_directory::{HttpStoreDirectory, StoreDirectory};
pub use upstream::{UpstreamError, UpstreamPolicy};
