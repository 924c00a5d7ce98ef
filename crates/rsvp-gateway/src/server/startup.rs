//! Startup Orchestrator - Handles Gateway initialization tasks
//!
//! Keeps GatewayServer focused on serving requests, not initialization.

use std::sync::Arc;

use rsvp_core::{OutboxRelay, StrategyRegistry};
use tracing::{info, warn};

/// Orchestrates startup tasks for the Gateway
pub struct StartupOrchestrator {
    relay: Arc<OutboxRelay>,
    strategies: Arc<StrategyRegistry>,
}

impl StartupOrchestrator {
    pub fn new(relay: Arc<OutboxRelay>, strategies: Arc<StrategyRegistry>) -> Self {
        Self { relay, strategies }
    }

    /// Log which roles can cancel
    pub fn report_strategies(&self) {
        let roles: Vec<String> = self
            .strategies
            .supported_roles()
            .iter()
            .map(ToString::to_string)
            .collect();
        info!("[Startup] Cancellation roles: {}", roles.join(", "));
    }

    /// Deliver events left pending by a previous run (crash after commit,
    /// failed publish). Returns the number delivered.
    pub async fn drain_outbox(&self) -> usize {
        match self.relay.flush().await {
            Ok(0) => 0,
            Ok(delivered) => {
                info!("[Startup] Delivered {} pending outbox events", delivered);
                delivered
            }
            Err(e) => {
                warn!("[Startup] Failed to drain outbox: {}", e);
                0
            }
        }
    }
}
