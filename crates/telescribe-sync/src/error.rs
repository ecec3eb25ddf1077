use thiserror::Error;

use telescribe_store::StoreError;
use telescribe_telegram::ProviderError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A reaction references a user the member directory does not know.
    /// Data-integrity failure: the directory is stale or corrupt relative
    /// to observed activity, so the batch must not be committed.
    #[error("reactor {user_id} on message {msg_id} not found in namelist")]
    ReactorNotInNamelist { user_id: String, msg_id: i64 },
}

pub type Result<T> = std::result::Result<T, SyncError>;
