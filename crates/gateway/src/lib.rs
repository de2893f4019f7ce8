//! HTTP gateway: receives Slack slash-command posts and the OAuth redirect,
//! runs the snippet pipeline, and sends replies back out.

pub mod pipeline;
pub mod routes;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use tracing::info;

pub use {
    pipeline::{CommandOutcome, run_command},
    routes::router,
    state::AppState,
    telemetry::{ErrorContext, LogSink, TelemetrySink, WebhookSink},
};

/// Bind the listener and serve until the process is stopped.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.bind, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, command = %state.config.slack.command, "snipbot gateway listening");
    axum::serve(listener, router(Arc::new(state))).await?;
    Ok(())
}
