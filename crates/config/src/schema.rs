use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("missing required setting `{0}` (set it in snipbot.toml or as SNIPBOT_* in the environment)")]
    MissingSetting(&'static str),
}

/// Top-level configuration. All sections have defaults; only the Slack app
/// credentials are mandatory, enforced by [`SnipbotConfig::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipbotConfig {
    pub server: ServerConfig,
    pub slack: SlackConfig,
    pub github: GitHubConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind: String,
    pub port: u16,
}

/// Slack app credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Slash command this bot answers to. Anything else gets a polite
    /// "don't know how" reply.
    pub command: String,

    pub client_id: String,

    #[serde(serialize_with = "serialize_secret")]
    pub client_secret: Secret<String>,

    /// Verification token compared against the `token` field of every
    /// inbound slash-command payload.
    #[serde(serialize_with = "serialize_secret")]
    pub verification_token: Secret<String>,

    /// Redirect URL registered with the Slack app, forwarded during the
    /// OAuth code exchange when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Optional bearer token; anonymous requests work but rate-limit fast.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_secret")]
    pub token: Option<Secret<String>>,

    /// Override for GitHub Enterprise installations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Where error reports are POSTed. Unset means reports only reach the
    /// structured log.
    pub webhook_url: Option<String>,
}

impl SnipbotConfig {
    /// Refuse to start without the Slack app credentials, mirroring the
    /// fail-fast startup check the service has always had.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slack.client_id.is_empty() {
            return Err(ConfigError::MissingSetting("slack.client_id"));
        }
        if self.slack.client_secret.expose_secret().is_empty() {
            return Err(ConfigError::MissingSetting("slack.client_secret"));
        }
        if self.slack.verification_token.expose_secret().is_empty() {
            return Err(ConfigError::MissingSetting("slack.verification_token"));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8088,
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            command: "/snip".to_string(),
            client_id: String::new(),
            client_secret: Secret::new(String::new()),
            verification_token: Secret::new(String::new()),
            redirect_url: None,
        }
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("command", &self.command)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("verification_token", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn serialize_opt_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
