use chrono::DateTime;
use tracing::{debug, warn};

use telescribe_core::types::{user_key, RawMessage, RawReaction, ReactionRecord};
use telescribe_telegram::{ChatProvider, ProviderError};

use crate::error::{Result, SyncError};
use crate::namelist::Namelist;

/// Fetch and resolve reactions for a batch of content messages.
///
/// One provider round-trip per message, sequential. Join-event messages
/// must not be passed in — they have no reaction lists to fetch.
///
/// Skips a message when the provider reports an invalid message id (the
/// usual zero-reactions response) or a malformed payload; fails the whole
/// batch when a reactor id is missing from the namelist, since that means
/// the member directory is stale relative to observed activity.
pub async fn resolve_reactions<P>(
    provider: &P,
    group_id: i64,
    messages: &[RawMessage],
    namelist: &Namelist,
    limit: u32,
) -> Result<Vec<ReactionRecord>>
where
    P: ChatProvider + ?Sized + Sync,
{
    // Resolve the peer once, not per message.
    let peer = provider.resolve_peer(group_id).await?;

    let mut records = Vec::new();
    for msg in messages {
        let list = match provider.message_reactions(&peer, msg.id, limit).await {
            Ok(list) => list,
            Err(e) if e.is_msg_id_invalid() => {
                debug!(msg_id = msg.id, "no reaction list for message, skipping");
                continue;
            }
            Err(ProviderError::Malformed(reason)) => {
                warn!(msg_id = msg.id, %reason, "malformed reaction response, skipping message");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match extract_reactions(msg.id, &list, namelist) {
            Ok(mut extracted) => records.append(&mut extracted),
            Err(SyncError::Provider(ProviderError::Malformed(reason))) => {
                warn!(msg_id = msg.id, %reason, "malformed reaction entry, skipping message");
                continue;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(records)
}

/// Build the persisted records for one message's reaction list.
///
/// The synthetic id ordinal counts down from the list length, matching
/// the historical id format already present in the table.
fn extract_reactions(
    msg_id: i64,
    list: &[RawReaction],
    namelist: &Namelist,
) -> Result<Vec<ReactionRecord>> {
    let mut records = Vec::with_capacity(list.len());
    let mut ordinal = list.len();

    for reaction in list {
        let datetime = DateTime::from_timestamp(reaction.date, 0)
            .ok_or_else(|| {
                ProviderError::Malformed(format!("reaction timestamp out of range: {}", reaction.date))
            })?
            .to_rfc3339();

        let user_id = reaction.user_id.map(user_key);
        let username = match &user_id {
            Some(id) => match namelist.get(id) {
                Some(entry) => entry.username.clone(),
                None => {
                    return Err(SyncError::ReactorNotInNamelist {
                        user_id: id.clone(),
                        msg_id,
                    })
                }
            },
            None => None,
        };

        records.push(ReactionRecord {
            reaction_id: format!("{msg_id}-{ordinal}"),
            msg_id,
            datetime,
            reaction: reaction.emoticon.clone(),
            user_id,
            username,
        });
        ordinal -= 1;
    }
    Ok(records)
}
