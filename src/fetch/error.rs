use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    // The only failure class the dam frame fetch retries
    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read response body from {0}")]
    Body(String, #[source] reqwest::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String, #[source] url::ParseError),
}

impl FetchError {
    /// Whether another attempt at the same URL may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FetchError::HttpStatus { .. })
    }

    /// The HTTP status code, when the failure carried one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
