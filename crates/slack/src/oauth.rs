//! OAuth v2 code exchange for workspace installs.

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::info,
};

use crate::{
    error::{Error, Result},
    store::WorkspaceToken,
};

const SLACK_API_BASE: &str = "https://slack.com/api";

/// Exchanges the `code` from Slack's OAuth redirect for a workspace token.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    api_base: String,
    client_id: String,
    client_secret: Secret<String>,
    redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAuthAccessResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    team: Option<TeamInfo>,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

impl OAuthClient {
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        redirect_url: Option<String>,
    ) -> Self {
        Self::with_api_base(SLACK_API_BASE, client_id, client_secret, redirect_url)
    }

    /// Point the client at a different API base (used by tests).
    #[must_use]
    pub fn with_api_base(
        api_base: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        redirect_url: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret,
            redirect_url,
        }
    }

    /// Run the `oauth.v2.access` exchange.
    pub async fn exchange_code(&self, code: &str) -> Result<WorkspaceToken> {
        let mut form: Vec<(&str, String)> = vec![
            ("code", code.to_string()),
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.expose_secret().clone()),
        ];
        if let Some(ref redirect) = self.redirect_url {
            form.push(("redirect_uri", redirect.clone()));
        }

        let response = self
            .http
            .post(format!("{}/oauth.v2.access", self.api_base))
            .form(&form)
            .send()
            .await?;
        let body: OAuthAccessResponse = response.json().await?;

        if !body.ok {
            return Err(Error::Api(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let team = body
            .team
            .ok_or_else(|| Error::Api("oauth response missing team".to_string()))?;
        let access_token = body
            .access_token
            .ok_or_else(|| Error::Api("oauth response missing access_token".to_string()))?;

        info!(team_id = %team.id, team_name = ?team.name, "workspace authorized");

        Ok(WorkspaceToken {
            team_id: team.id,
            team_name: team.name,
            access_token,
            installed_at: now_secs(),
        })
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
