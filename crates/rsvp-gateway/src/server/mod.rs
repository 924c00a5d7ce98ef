//! Gateway Server
//!
//! HTTP surface over the reservation application services.
//! Self-contained with dependency injection for clean architecture.

mod dependencies;
pub mod error;
mod handlers;
pub mod logging_middleware;
mod startup;

pub use dependencies::{DependenciesBuilder, GatewayDependencies};
pub use error::{error_response, status_for, ApiError, CorrelationId};
pub use handlers::AppState;
pub use startup::StartupOrchestrator;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::GatewayConfig;
use crate::consumers::EventAuditLogger;
use rsvp_core::{ApplicationServices, ApplicationServicesBuilder, EventBus};

/// Build the Axum router
///
/// Public so tests can drive it with `tower::ServiceExt::oneshot`.
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/reservations",
            post(handlers::book_reservation).get(handlers::list_reservations),
        )
        .route("/reservations/{id}", get(handlers::get_reservation))
        .route(
            "/reservations/{id}/cancel",
            post(handlers::cancel_reservation),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(
            logging_middleware::http_logging_middleware,
        ));

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
}

/// RSVP Gateway Server
///
/// Self-contained server that manages its own services and lifecycle.
/// All external dependencies are injected through the constructor.
pub struct GatewayServer {
    config: GatewayConfig,
    services: Arc<ApplicationServices>,
}

impl GatewayServer {
    /// Create a new gateway server with dependency injection
    ///
    /// Fails if the strategy registry is ambiguous.
    pub fn new(config: GatewayConfig, dependencies: GatewayDependencies) -> anyhow::Result<Self> {
        info!("[Gateway] Initializing with dependency injection...");

        let services = ApplicationServicesBuilder::new()
            .with_event_bus(Arc::new(EventBus::new()))
            .with_reservation_repo(dependencies.reservation_repo)
            .with_outbox_repo(dependencies.outbox_repo)
            .with_store_directory(dependencies.store_directory)
            .with_policy_source(dependencies.policy_source)
            .with_upstream_policy(config.upstream.clone())
            .build()?;

        info!("[Gateway] Services initialized successfully");

        Ok(Self {
            config,
            services: Arc::new(services),
        })
    }

    /// Application services backing this server
    pub fn services(&self) -> Arc<ApplicationServices> {
        self.services.clone()
    }

    /// Build the router for this server's state
    pub fn router(&self) -> Router {
        build_router(AppState::new(self.services.clone()), self.config.enable_cors)
    }

    /// Run the gateway server
    ///
    /// This is the main entry point. It:
    /// 1. Starts event consumers
    /// 2. Drains events left in the outbox
    /// 3. Serves HTTP until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr()?;

        info!("[Gateway] Starting on {}", addr);
        info!(
            "[Gateway] CORS: {}",
            if self.config.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );
        info!(
            "[Gateway] Store directory: {}, policy service: {}",
            self.config.directory_url, self.config.policy_url
        );

        // Subscribe before draining so the audit log sees redelivered events
        Arc::new(EventAuditLogger::new()).start(self.services.subscribe());

        let startup = StartupOrchestrator::new(
            self.services.relay.clone(),
            self.services.strategies.clone(),
        );
        startup.report_strategies();
        startup.drain_outbox().await;

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("[Gateway] Ready to accept connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("[Gateway] Stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("[Gateway] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[Gateway] Shutdown requested");
}
