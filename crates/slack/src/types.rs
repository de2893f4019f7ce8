use serde::{Deserialize, Serialize};

/// Inbound slash-command payload, form-decoded from the gateway request.
/// Slack sends more fields than these; the rest are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    pub token: String,
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub response_url: String,
}

/// Who gets to see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible to the whole channel.
    InChannel,
    /// Visible only to the requesting user.
    Ephemeral,
}

/// Body of a slash-command response or a `response_url` follow-up post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub response_type: ResponseType,
    pub text: String,
}

impl CommandReply {
    #[must_use]
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
        }
    }
}
