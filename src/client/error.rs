use reqwest::StatusCode;

/// Errors from the backend API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Status {
        status: StatusCode,
        /// Raw response body, passed through untouched.
        body: String,
    },

    /// The success payload did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status of a backend rejection.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body, if the backend sent one.
    pub fn backend_message(&self) -> Option<String> {
        let ClientError::Status { body, .. } = self else {
            return None;
        };
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        json.get("message")?.as_str().map(str::to_owned)
    }
}
