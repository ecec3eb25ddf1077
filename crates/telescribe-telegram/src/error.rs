use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the message id. Expected for messages with
    /// no reactions — callers skip the message and continue.
    #[error("invalid message id: {msg_id}")]
    MsgIdInvalid { msg_id: i64 },

    /// Response arrived but did not have the expected structure.
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("gateway API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Gateway unreachable (connect/timeout).
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// True for the benign no-reactions case callers skip over.
    pub fn is_msg_id_invalid(&self) -> bool {
        matches!(self, ProviderError::MsgIdInvalid { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
