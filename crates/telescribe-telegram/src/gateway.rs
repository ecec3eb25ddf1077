use serde::{Deserialize, Serialize};
use tracing::debug;

use async_trait::async_trait;
use telescribe_core::types::{RawMessage, RawReaction};

use crate::error::ProviderError;
use crate::provider::{ChatProvider, PeerHandle};

/// HTTP/JSON client for the MTProto gateway.
///
/// The gateway wraps a logged-in user session and exposes the raw-method
/// surface the sync job needs (`resolvePeer`, `getHistory`,
/// `getMessageReactionsList`). Authentication is a bearer token.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct ResolvePeerBody {
    group_id: i64,
}

#[derive(Serialize)]
struct HistoryBody {
    group_id: i64,
    offset_id: i64,
    limit: u32,
}

#[derive(Serialize)]
struct ReactionsBody {
    peer_id: i64,
    access_hash: i64,
    msg_id: i64,
    limit: u32,
}

#[derive(Deserialize)]
struct HistoryResponse {
    messages: Vec<RawMessage>,
}

#[derive(Deserialize)]
struct ReactionsResponse {
    reactions: Vec<RawReaction>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    description: String,
}

impl GatewayClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn post<B: Serialize>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/api/{}", self.base_url, method);
        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::Unavailable(e.to_string())
                } else {
                    ProviderError::Http(e)
                }
            })
    }

    /// Map a non-success gateway response to the pipeline's error
    /// taxonomy. MSG_ID_INVALID is the gateway's word for "no reaction
    /// list for this message".
    async fn api_error(resp: reqwest::Response, msg_id: Option<i64>) -> ProviderError {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|b| b.description)
            .unwrap_or_else(|_| text.clone());
        match msg_id {
            Some(msg_id) if status == 400 && description.contains("MSG_ID_INVALID") => {
                ProviderError::MsgIdInvalid { msg_id }
            }
            _ => ProviderError::Api {
                status,
                message: description,
            },
        }
    }
}

#[async_trait]
impl ChatProvider for GatewayClient {
    async fn resolve_peer(&self, group_id: i64) -> Result<PeerHandle, ProviderError> {
        debug!(group_id, "resolving peer");
        let resp = self.post("resolvePeer", &ResolvePeerBody { group_id }).await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, None).await);
        }
        resp.json::<PeerHandle>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    async fn history_page(
        &self,
        group_id: i64,
        offset_id: i64,
        limit: u32,
    ) -> Result<Vec<RawMessage>, ProviderError> {
        debug!(group_id, offset_id, limit, "fetching history page");
        let resp = self
            .post(
                "getHistory",
                &HistoryBody {
                    group_id,
                    offset_id,
                    limit,
                },
            )
            .await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, None).await);
        }
        let page: HistoryResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(page.messages)
    }

    async fn message_reactions(
        &self,
        peer: &PeerHandle,
        msg_id: i64,
        limit: u32,
    ) -> Result<Vec<RawReaction>, ProviderError> {
        debug!(msg_id, limit, "fetching reaction list");
        let resp = self
            .post(
                "getMessageReactionsList",
                &ReactionsBody {
                    peer_id: peer.peer_id,
                    access_hash: peer.access_hash,
                    msg_id,
                    limit,
                },
            )
            .await?;
        if !resp.status().is_success() {
            return Err(Self::api_error(resp, Some(msg_id)).await);
        }
        let list: ReactionsResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(list.reactions)
    }
}
