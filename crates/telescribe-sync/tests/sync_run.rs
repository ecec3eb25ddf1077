//! End-to-end sync runs against a mock gateway and an in-memory store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rusqlite::Connection;

use telescribe_core::config::SyncConfig;
use telescribe_core::types::{RawMessage, RawReaction, RawUser};
use telescribe_store::Store;
use telescribe_sync::{run_sync, SyncError};
use telescribe_telegram::{ChatProvider, PeerHandle, ProviderError};

/// Mock gateway: fixed newest-first history plus a per-message reaction
/// table. Messages without an entry answer MSG_ID_INVALID, like the real
/// gateway does for messages nobody reacted to. Records which ids were
/// asked for reactions.
struct MockGateway {
    history: Vec<RawMessage>,
    reactions: HashMap<i64, Vec<RawReaction>>,
    malformed: Vec<i64>,
    asked: Mutex<Vec<i64>>,
}

impl MockGateway {
    fn new(history: Vec<RawMessage>) -> Self {
        Self {
            history,
            reactions: HashMap::new(),
            malformed: Vec::new(),
            asked: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatProvider for MockGateway {
    async fn resolve_peer(&self, group_id: i64) -> Result<PeerHandle, ProviderError> {
        Ok(PeerHandle {
            peer_id: group_id,
            access_hash: 42,
        })
    }

    async fn history_page(
        &self,
        _group_id: i64,
        offset_id: i64,
        limit: u32,
    ) -> Result<Vec<RawMessage>, ProviderError> {
        Ok(self
            .history
            .iter()
            .filter(|m| offset_id == 0 || m.id < offset_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn message_reactions(
        &self,
        _peer: &PeerHandle,
        msg_id: i64,
        _limit: u32,
    ) -> Result<Vec<RawReaction>, ProviderError> {
        self.asked.lock().unwrap().push(msg_id);
        if self.malformed.contains(&msg_id) {
            return Err(ProviderError::Malformed("truncated reaction list".into()));
        }
        match self.reactions.get(&msg_id) {
            Some(list) => Ok(list.clone()),
            None => Err(ProviderError::MsgIdInvalid { msg_id }),
        }
    }
}

fn text_msg(id: i64, user_id: i64, username: &str, text: &str) -> RawMessage {
    RawMessage {
        id,
        date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        from: Some(RawUser {
            id: user_id,
            username: Some(username.into()),
            first_name: None,
            last_name: None,
        }),
        text: Some(text.into()),
        caption: None,
        reply_to_message_id: None,
        poll: None,
        media_type: None,
        new_chat_members: Vec::new(),
        service: None,
    }
}

fn join_msg(id: i64, joiner_id: i64, username: &str) -> RawMessage {
    RawMessage {
        new_chat_members: vec![RawUser {
            id: joiner_id,
            username: Some(username.into()),
            first_name: Some("New".into()),
            last_name: None,
        }],
        from: None,
        text: None,
        ..text_msg(id, 0, "", "")
    }
}

fn reaction(date: i64, emoticon: &str, user_id: i64) -> RawReaction {
    RawReaction {
        date,
        emoticon: emoticon.into(),
        user_id: Some(user_id),
    }
}

fn mem_store() -> Store {
    Store::new(Connection::open_in_memory().unwrap()).unwrap()
}

#[tokio::test]
async fn first_run_mirrors_messages_members_and_reactions() {
    let mut gateway = MockGateway::new(vec![
        text_msg(103, 7, "alice", "third"),
        join_msg(102, 9, "newbie"),
        text_msg(101, 7, "alice", "first"),
    ]);
    // the joiner from this same batch reacts to an older message in it
    gateway
        .reactions
        .insert(101, vec![reaction(1767600000, "👍", 9)]);

    let mut store = mem_store();
    let report = run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();

    assert_eq!(report.new_messages, 3);
    assert_eq!(report.chat_messages, 2);
    assert_eq!(report.new_members, 1);
    assert_eq!(report.reactions, 1);
    assert_eq!(store.counts().unwrap(), (2, 1, 1));
    assert_eq!(store.high_water_mark().unwrap(), 103);

    // join-event messages are never asked for reactions
    let asked = gateway.asked.lock().unwrap().clone();
    assert!(asked.contains(&103) && asked.contains(&101));
    assert!(!asked.contains(&102));

    let members = store.all_members().unwrap();
    assert_eq!(members[0].user_id, "user9");
    assert_eq!(members[0].username.as_deref(), Some("newbie"));
}

#[tokio::test]
async fn second_run_with_no_new_activity_inserts_nothing() {
    let gateway = MockGateway::new(vec![text_msg(50, 7, "alice", "hi")]);
    let mut store = mem_store();

    run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();
    let after_first = store.counts().unwrap();

    let report = run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();
    assert_eq!(report.new_messages, 0);
    assert_eq!(store.counts().unwrap(), after_first);
}

#[tokio::test]
async fn high_water_scan_ignores_already_stored_ids() {
    // seed the store up to id 100
    let gateway = MockGateway::new(vec![text_msg(100, 7, "alice", "old")]);
    let mut store = mem_store();
    run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();

    let gateway = MockGateway::new(vec![
        text_msg(105, 7, "alice", "e"),
        text_msg(104, 7, "alice", "d"),
        text_msg(103, 7, "alice", "c"),
        text_msg(99, 7, "alice", "stale"),
    ]);
    let report = run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();
    assert_eq!(report.new_messages, 3);
    assert_eq!(store.high_water_mark().unwrap(), 105);
    // 99 was below the mark and never ingested
    let (messages, _, _) = store.counts().unwrap();
    assert_eq!(messages, 4);
}

#[tokio::test]
async fn trailing_join_event_advances_the_cursor() {
    // the newest message is a join event, which produces no chat row;
    // the cursor must still move past it or every later run re-ingests
    // the join and duplicates the member
    let gateway = MockGateway::new(vec![join_msg(10, 5, "newbie")]);
    let mut store = mem_store();

    run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();
    assert_eq!(store.high_water_mark().unwrap(), 10);
    let (_, members, _) = store.counts().unwrap();
    assert_eq!(members, 1);

    let report = run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();
    assert_eq!(report.new_messages, 0);
    assert_eq!(report.new_members, 0);
    let (_, members, _) = store.counts().unwrap();
    assert_eq!(members, 1);
}

#[tokio::test]
async fn malformed_reaction_response_skips_only_that_message() {
    let mut gateway = MockGateway::new(vec![
        text_msg(202, 7, "alice", "fine"),
        text_msg(201, 7, "alice", "broken"),
    ]);
    gateway
        .reactions
        .insert(202, vec![reaction(1767600000, "🔥", 7)]);
    gateway.malformed.push(201);

    let mut store = mem_store();
    // user7 must be known for the reaction join to succeed
    let seed = MockGateway::new(vec![join_msg(1, 7, "alice")]);
    run_sync(&seed, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();

    let report = run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap();
    assert_eq!(report.chat_messages, 2);
    assert_eq!(report.reactions, 1);
}

#[tokio::test]
async fn unknown_reactor_aborts_run_and_commits_nothing() {
    let mut gateway = MockGateway::new(vec![text_msg(301, 7, "alice", "hi")]);
    gateway
        .reactions
        .insert(301, vec![reaction(1767600000, "👍", 999)]);

    let mut store = mem_store();
    let err = run_sync(&gateway, &mut store, -100, &SyncConfig::default())
        .await
        .unwrap_err();

    match err {
        SyncError::ReactorNotInNamelist { user_id, msg_id } => {
            assert_eq!(user_id, "user999");
            assert_eq!(msg_id, 301);
        }
        other => panic!("unexpected error: {other}"),
    }
    // nothing was committed, so the next run will redo the whole batch
    assert_eq!(store.counts().unwrap(), (0, 0, 0));
    assert_eq!(store.high_water_mark().unwrap(), 0);
}
