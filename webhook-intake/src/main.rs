//! Webhook intake server - receives Contentful deliveries for the blog.
//!
//! Serves one route: POST for signed webhook deliveries and GET for a
//! liveness probe.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webhook_intake::web::is_signature_verification_enabled;
use webhook_intake::{app_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env();
    log_config(&config);

    run(config).await?;

    info!("intake_stopped");
    Ok(())
}

/// JSON logs, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();
}

fn log_config(config: &Config) {
    let signing_configured = is_signature_verification_enabled(&config.webhook_secret);
    info!(
        port = config.port,
        webhook_path = %config.webhook_path,
        signing_configured = signing_configured,
        reject_unsigned = config.reject_unsigned,
        max_body_bytes = ?config.max_body_bytes,
        "config_loaded"
    );

    match (signing_configured, config.reject_unsigned) {
        (false, _) => warn!("webhook_secret_not_configured"),
        (true, false) => warn!("unsigned_deliveries_accepted"),
        (true, true) => {}
    }
}

/// Serve the intake route until SIGINT or SIGTERM.
async fn run(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(address = %addr, path = %config.webhook_path, "intake_listening");

    let app = app_router(AppState::new(config));

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let received = wait_for_shutdown().await;
            info!(signal = received, "intake_draining");
        })
        .await
        .context("Server error")
}

/// Resolve with the name of the first shutdown signal received.
/// A handler that fails to install never fires.
async fn wait_for_shutdown() -> &'static str {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!(error = %e, "sigint_listener_unavailable");
                std::future::pending().await
            }
        }
    };

    tokio::select! {
        name = interrupt => name,
        name = terminate() => name,
    }
}

#[cfg(unix)]
async fn terminate() -> &'static str {
    use tokio::signal::unix::{signal as unix_signal, SignalKind};

    match unix_signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
            "SIGTERM"
        }
        Err(e) => {
            warn!(error = %e, "sigterm_listener_unavailable");
            std::future::pending().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() -> &'static str {
    std::future::pending().await
}
