use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use telescribe_core::types::{RawMessage, RawReaction};

use crate::error::ProviderError;

/// Provider-side handle for a resolved group. Opaque to the pipeline;
/// resolved once per run and passed back on reaction requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerHandle {
    pub peer_id: i64,
    pub access_hash: i64,
}

/// The three provider operations the sync pipeline consumes.
///
/// Implemented by [`crate::GatewayClient`] for real runs and by mock
/// providers in tests.
#[async_trait]
pub trait ChatProvider {
    /// Resolve a group id to an input-peer handle.
    async fn resolve_peer(&self, group_id: i64) -> Result<PeerHandle, ProviderError>;

    /// One page of group history, newest first. `offset_id = 0` starts at
    /// the newest message; otherwise the page starts strictly below the
    /// given id. An empty page means history is exhausted.
    async fn history_page(
        &self,
        group_id: i64,
        offset_id: i64,
        limit: u32,
    ) -> Result<Vec<RawMessage>, ProviderError>;

    /// Up to `limit` reactions for one message. Fails with
    /// [`ProviderError::MsgIdInvalid`] when the provider has no reaction
    /// list for the id (the usual zero-reactions response).
    async fn message_reactions(
        &self,
        peer: &PeerHandle,
        msg_id: i64,
        limit: u32,
    ) -> Result<Vec<RawReaction>, ProviderError>;
}
