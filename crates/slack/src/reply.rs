//! Outbound reply dispatch.
//!
//! The first fragment of a reply rides back on the slash command's HTTP
//! response; everything after it is POSTed to the command's `response_url`.

use {async_trait::async_trait, tracing::debug};

use crate::{
    error::{Error, Result},
    types::CommandReply,
};

/// Seam for posting follow-up replies, so the gateway can be exercised with
/// a recording fake.
#[async_trait]
pub trait ReplyDispatcher: Send + Sync {
    /// POST one follow-up reply to the command's response URL.
    async fn send_followup(&self, response_url: &str, reply: &CommandReply) -> Result<()>;
}

/// Production dispatcher backed by a shared HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpReplyDispatcher {
    http: reqwest::Client,
}

impl HttpReplyDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReplyDispatcher for HttpReplyDispatcher {
    async fn send_followup(&self, response_url: &str, reply: &CommandReply) -> Result<()> {
        let response = self.http.post(response_url).json(reply).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("response_url returned HTTP {status}")));
        }
        Ok(())
    }
}

/// Send every fragment after the first as an in-channel follow-up, awaiting
/// each post before issuing the next so Slack renders them in send order.
/// The first failure ends the chain; the caller decides what to do with it.
pub async fn send_followups(
    dispatcher: &dyn ReplyDispatcher,
    response_url: &str,
    fragments: &[String],
) -> Result<()> {
    for (index, fragment) in fragments.iter().enumerate().skip(1) {
        debug!(index, bytes = fragment.len(), "posting follow-up fragment");
        dispatcher
            .send_followup(response_url, &CommandReply::public(fragment.clone()))
            .await?;
    }
    Ok(())
}
