use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Platform responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Platform error: {0}")]
    ProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl PlatformError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlatformError::NetworkError(_)
                | PlatformError::Status { .. }
                | PlatformError::ProviderError(_)
        )
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            PlatformError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            PlatformError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            match status.as_u16() {
                404 => PlatformError::NotFound(error.to_string()),
                401 | 403 => PlatformError::Unauthorized(error.to_string()),
                code => PlatformError::Status {
                    status: code,
                    body: error.to_string(),
                },
            }
        } else if error.is_decode() {
            PlatformError::InvalidMetadata(error.to_string())
        } else if error.is_body() || error.is_request() {
            PlatformError::NetworkError(error.to_string())
        } else {
            PlatformError::InternalError(error.to_string())
        }
    }
}
