//! RSVP gateway binary

use anyhow::{Context, Result};
use rsvp_core::branding;
use rsvp_gateway::{GatewayConfig, GatewayDependencies, GatewayServer};
use tracing::info;

/// Logs directory under the platform data directory
fn logs_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(branding::IDENTIFIER)
        .join("logs")
}

/// Initialize tracing with console and file logging
///
/// - Console: colored, compact format
/// - File: daily rotation in ~/.local/share/rsvp/logs/ (Linux)
fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let logs_dir = logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create logs directory {:?}", logs_dir))?;

    // Creates files like: rsvp.2026-01-22.log
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(branding::LOG_PREFIX)
        .filename_suffix("log")
        .build(&logs_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG takes precedence, with sensible defaults for our crates
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info")
            .add_directive("rsvp_core=debug".parse()?)
            .add_directive("rsvp_gateway=debug".parse()?)
            .add_directive("rsvp_storage=debug".parse()?)
            .add_directive("audit=info".parse()?)
            .add_directive("tower_http=info".parse()?),
    };

    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    // Must be kept alive for the duration of the program
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    let _guard = init_tracing()?;

    info!("{} gateway v{}", branding::DISPLAY_NAME, env!("CARGO_PKG_VERSION"));

    let config = GatewayConfig::from_env().context("Invalid gateway configuration")?;
    let dependencies = GatewayDependencies::from_config(&config)?;
    let server = GatewayServer::new(config, dependencies)?;

    server.run().await
}
