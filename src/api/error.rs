use thiserror::Error;

/// Errors surfaced by the remote API layer.
///
/// Stale fetch responses are deliberately not represented here: superseded
/// completions are an internal consistency guard in the controller and are
/// dropped before they could become either an error or a success.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::InvalidResponse(value.to_string());
        }
        Self::Network(value.to_string())
    }
}
