use {
    base64::Engine,
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use snipbot_snippet::FileRequest;

use crate::error::FetchError;

const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "snipbot";

/// Ref used when the command does not name one.
pub const DEFAULT_REF: &str = "master";

/// Client for the repository contents API.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<Secret<String>>,
}

/// Contents API success body for a file.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl ContentClient {
    #[must_use]
    pub fn new(token: Option<Secret<String>>) -> Self {
        Self::with_api_base(GITHUB_API_BASE, token)
    }

    /// Point the client at a different API base (used by tests).
    #[must_use]
    pub fn with_api_base(api_base: impl Into<String>, token: Option<Secret<String>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Fetch the raw text of the requested file.
    pub async fn fetch(&self, request: &FileRequest) -> Result<String, FetchError> {
        let git_ref = request.git_ref.as_deref().unwrap_or(DEFAULT_REF);
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, request.owner, request.repo, request.path
        );

        debug!(
            owner = %request.owner,
            repo = %request.repo,
            path = %request.path,
            git_ref,
            "fetching file contents"
        );

        let mut http_request = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .query(&[("ref", git_ref)]);
        if let Some(ref token) = self.token {
            http_request = http_request.bearer_auth(token.expose_secret());
        }

        let response = http_request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(map_failure(status, response, git_ref).await);
        }

        let body: serde_json::Value = response.json().await?;
        decode_contents(body, &request.path)
    }
}

/// Map a non-2xx contents response onto a [`FetchError`].
async fn map_failure(
    status: reqwest::StatusCode,
    response: reqwest::Response,
    git_ref: &str,
) -> FetchError {
    let rate_limited = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0");

    let message = response
        .json::<ApiErrorBody>()
        .await
        .map(|b| b.message)
        .unwrap_or_default();

    if status == reqwest::StatusCode::NOT_FOUND {
        if message.starts_with("No commit found") {
            return FetchError::UnknownRef(git_ref.to_string());
        }
        return FetchError::NotFound;
    }

    let throttled = status == reqwest::StatusCode::FORBIDDEN
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS;
    if throttled && rate_limited {
        return FetchError::RateLimited;
    }

    FetchError::Status(status)
}

/// Decode a contents payload. Directories come back as a JSON array; files
/// carry base64 content with embedded newlines.
fn decode_contents(body: serde_json::Value, path: &str) -> Result<String, FetchError> {
    if body.is_array() {
        return Err(FetchError::NotAFile(path.to_string()));
    }

    let contents: ContentsResponse =
        serde_json::from_value(body).map_err(|e| FetchError::Payload(e.to_string()))?;

    if contents.encoding != "base64" {
        return Err(FetchError::Encoding(contents.encoding));
    }

    let packed: String = contents
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(packed)?;
    Ok(String::from_utf8(bytes)?)
}
