//! Error telemetry sink.
//!
//! The sink is an external collaborator: reports are fire-and-forget, and no
//! command ever fails because a report didn't land.

use {async_trait::async_trait, serde::Serialize, tracing::{error, warn}};

/// Tags attached to every report: which command triggered it and where from.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorContext {
    pub command: String,
    pub raw_text: String,
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
}

#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Deliver one error report. Best effort.
    async fn capture(&self, message: &str, context: &ErrorContext);
}

/// Fallback sink: reports land in the structured log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl TelemetrySink for LogSink {
    async fn capture(&self, message: &str, context: &ErrorContext) {
        error!(
            command = %context.command,
            raw_text = %context.raw_text,
            team_id = %context.team_id,
            channel_id = %context.channel_id,
            user_id = %context.user_id,
            "{message}"
        );
    }
}

/// POSTs reports as JSON to a configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    error: &'a str,
    #[serde(flatten)]
    context: &'a ErrorContext,
}

#[async_trait]
impl TelemetrySink for WebhookSink {
    async fn capture(&self, message: &str, context: &ErrorContext) {
        let report = Report {
            error: message,
            context,
        };
        match self.http.post(&self.url).json(&report).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "telemetry webhook rejected report");
            },
            Ok(_) => {},
            Err(e) => warn!(error = %e, "telemetry webhook unreachable"),
        }
    }
}
