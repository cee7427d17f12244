//! HR assistant webhook server

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use hr_assistant_config::load_settings;
use hr_assistant_server::{build_controller, create_router, sweeper, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings().context("loading settings")?;
    telemetry::init_tracing(&settings.observability)?;
    let metrics = telemetry::init_metrics(&settings.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_source = ?settings.data.source,
        relay_mode = ?settings.relay.mode,
        retention = ?settings.conversation.retention_policy(),
        "Starting HR assistant"
    );

    let controller = build_controller(&settings).context("building dialogue controller")?;
    let sweeper = sweeper::spawn_sweeper(
        controller.clone(),
        Duration::from_secs(settings.conversation.sweep_interval_secs.max(1)),
    );

    let mut state =
        AppState::new(controller).with_webhook_secret(settings.server.webhook_secret.clone());
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }
    let router = create_router(
        state,
        &settings.server.webhook_path,
        Duration::from_secs(settings.server.request_timeout_secs),
    );

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("parsing listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, webhook_path = %settings.server.webhook_path, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
