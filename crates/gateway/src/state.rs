use std::sync::Arc;

use {
    snipbot_config::SnipbotConfig,
    snipbot_github::ContentClient,
    snipbot_slack::{HttpReplyDispatcher, OAuthClient, ReplyDispatcher, TokenStore},
};

use crate::telemetry::{LogSink, TelemetrySink, WebhookSink};

/// Everything a request handler needs, constructed once at startup from the
/// immutable config. Cloning is cheap; the handlers share one instance
/// behind an `Arc` anyway.
pub struct AppState {
    pub config: SnipbotConfig,
    pub github: ContentClient,
    pub oauth: OAuthClient,
    pub tokens: TokenStore,
    pub dispatcher: Arc<dyn ReplyDispatcher>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl AppState {
    #[must_use]
    pub fn new(config: SnipbotConfig) -> Self {
        let github = match config.github.api_base.as_deref() {
            Some(base) => ContentClient::with_api_base(base, config.github.token.clone()),
            None => ContentClient::new(config.github.token.clone()),
        };

        let oauth = OAuthClient::new(
            config.slack.client_id.clone(),
            config.slack.client_secret.clone(),
            config.slack.redirect_url.clone(),
        );

        let telemetry: Arc<dyn TelemetrySink> = match config.telemetry.webhook_url.as_deref() {
            Some(url) => Arc::new(WebhookSink::new(url)),
            None => Arc::new(LogSink),
        };

        Self {
            config,
            github,
            oauth,
            tokens: TokenStore::new(),
            dispatcher: Arc::new(HttpReplyDispatcher::new()),
            telemetry,
        }
    }
}
