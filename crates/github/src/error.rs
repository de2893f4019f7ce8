use thiserror::Error;

/// Content-provider failures. The `Display` text is relayed verbatim to the
/// requester in an ephemeral reply.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The repository or path does not exist (or is private to us).
    #[error("Not Found")]
    NotFound,

    /// The repository exists but the requested ref does not.
    #[error("no commit found for ref `{0}`")]
    UnknownRef(String),

    #[error("GitHub rate limit exceeded")]
    RateLimited,

    /// The path resolved to a directory, not a file.
    #[error("`{0}` is not a file")]
    NotAFile(String),

    #[error("GitHub returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unsupported content encoding `{0}`")]
    Encoding(String),

    #[error("unexpected contents payload: {0}")]
    Payload(String),

    #[error("failed to decode file content: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("file content is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl FetchError {
    /// Not-found errors are user mistakes, not provider incidents; telemetry
    /// skips them.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound | Self::UnknownRef(_))
    }
}
