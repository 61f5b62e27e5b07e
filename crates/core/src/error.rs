//! Error types shared by Love-OS providers and the flow engine.
//!
//! Uses `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Failures of the external generation backend (auth, network, quota,
/// malformed response).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching error variant.
    ///
    /// `body` is only kept for the generic `ApiError` case.
    pub fn from_status(status_code: u16, body: impl Into<String>) -> Self {
        match status_code {
            429 => Self::RateLimited {
                retry_after_secs: 5,
            },
            401 | 403 => Self::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ),
            404 => Self::ModelNotFound(body.into()),
            _ => Self::ApiError {
                status_code,
                message: body.into(),
            },
        }
    }
}
