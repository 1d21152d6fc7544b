use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to {provider} failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("unexpected {provider} payload: {message}")]
    Malformed { provider: String, message: String },
}

impl LlmError {
    /// HTTP 401/403 from the provider.
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::Status { status: 401 | 403, .. })
    }
}
