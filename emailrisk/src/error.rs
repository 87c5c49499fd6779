// Typed error taxonomy for the validation pipeline. The teacher returns
// `anyhow::Result` everywhere; at the service boundary we want a closed
// set of kinds the HTTP layer can map to status codes, so errors that
// cross that boundary go through `ErrorKind` instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid email format: {0}")]
    InvalidFormat(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("reference/config store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// HTTP status code this kind maps to at the axum boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) | Self::InvalidFormat(_) => 400,
            Self::InvalidConfig(_) => 422,
            Self::StoreUnavailable(_) | Self::UpstreamUnavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ErrorKind>;
