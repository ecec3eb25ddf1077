use tracing::{debug, info};

use telescribe_core::config::SyncConfig;
use telescribe_core::types::RawMessage;
use telescribe_store::Store;
use telescribe_telegram::ChatProvider;

use crate::error::Result;
use crate::namelist::Namelist;
use crate::process::process_batch;
use crate::reactions::resolve_reactions;

/// What one run did, for the operator log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub high_water: i64,
    pub new_messages: usize,
    pub chat_messages: usize,
    pub new_members: usize,
    pub reactions: usize,
}

/// One incremental sync run.
///
/// Fetches everything above the stored high-water mark, classifies it,
/// resolves reactions against the refreshed namelist and commits all
/// derived rows in a single transaction. The committed cursor is the
/// run's top fetched id, so a join event at the top of history (which
/// produces no chat row) still advances the mark and is never
/// re-ingested. Returns the run's counts.
pub async fn run_sync<P>(
    provider: &P,
    store: &mut Store,
    group_id: i64,
    sync: &SyncConfig,
) -> Result<SyncReport>
where
    P: ChatProvider + ?Sized + Sync,
{
    let high_water = store.high_water_mark()?;
    info!(group_id, high_water, "starting sync run");

    let new_messages = fetch_new_messages(provider, group_id, high_water, sync).await?;
    info!(count = new_messages.len(), "new messages since last run");

    let (chat_messages, new_members) = process_batch(&new_messages);

    // Namelist = full stored member table plus this run's joiners, so a
    // reaction from someone who joined in this very batch still resolves.
    let mut namelist = Namelist::from_members(&store.all_members()?);
    namelist.extend(&new_members);

    // Join events have no reactions to fetch; only content messages go in.
    let content: Vec<RawMessage> = new_messages
        .iter()
        .filter(|m| !m.is_join_event())
        .cloned()
        .collect();
    let reactions = resolve_reactions(
        provider,
        group_id,
        &content,
        &namelist,
        sync.reaction_limit,
    )
    .await?;

    // newest-first scan: the first new message carries the run's top id
    let next_mark = new_messages.first().map_or(high_water, |m| m.id);
    store.commit_batch(&chat_messages, &new_members, &reactions, next_mark)?;

    let report = SyncReport {
        high_water,
        new_messages: new_messages.len(),
        chat_messages: chat_messages.len(),
        new_members: new_members.len(),
        reactions: reactions.len(),
    };
    info!(?report, "sync run complete");
    Ok(report)
}

/// Scan history newest-first until the high-water mark (or the cap) is
/// reached. The provider's newest-first ordering is contiguous, so the
/// first id at or below the mark ends the scan.
async fn fetch_new_messages<P>(
    provider: &P,
    group_id: i64,
    high_water: i64,
    sync: &SyncConfig,
) -> Result<Vec<RawMessage>>
where
    P: ChatProvider + ?Sized + Sync,
{
    let cap = sync.history_cap as usize;
    let mut new_messages: Vec<RawMessage> = Vec::new();
    let mut offset_id = 0;

    'scan: while new_messages.len() < cap {
        let remaining = (cap - new_messages.len()).min(sync.page_size as usize) as u32;
        let page = provider.history_page(group_id, offset_id, remaining).await?;
        if page.is_empty() {
            break; // history exhausted
        }
        debug!(offset_id, page = page.len(), "history page fetched");
        for msg in page {
            if msg.id <= high_water {
                break 'scan;
            }
            offset_id = msg.id;
            new_messages.push(msg);
        }
    }
    Ok(new_messages)
}
