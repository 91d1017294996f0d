// ================================================================
// File: crafthead-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Path, view, size or model query that cannot be routed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Asset missing: {0}")]
    AssetMissing(String),

    #[error("Render engine failure: {0}")]
    RenderEngineFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// HTTP status the front door should answer with when this error escapes
    /// the orchestrator.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidRequest(_) => 400,
            Error::InvalidIdentity(_) => 404,
            Error::UpstreamTimeout(_) => 504,
            _ => 500,
        }
    }

    /// Errors the orchestrator absorbs into a fallback image or a cache miss.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AssetMissing(_)
                | Error::RenderEngineFailure(_)
                | Error::Storage(_)
                | Error::Image(_)
        )
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}
