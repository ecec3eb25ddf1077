use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable string key used for people across all three tables:
/// `"user"` + the numeric Telegram id.
pub fn user_key(id: i64) -> String {
    format!("user{id}")
}

/// A user object as the gateway sends it (sender, joiner or reactor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUser {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Poll payload attached to a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPoll {
    pub question: String,
    pub total_voter_count: i64,
}

/// One message from the group's history, as fetched from the gateway.
///
/// `id` is strictly increasing within a group and serves as the sync
/// cursor. A non-empty `new_chat_members` list marks the message as a
/// join event; such a message carries no chat content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub from: Option<RawUser>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub reply_to_message_id: Option<i64>,
    #[serde(default)]
    pub poll: Option<RawPoll>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub new_chat_members: Vec<RawUser>,
    /// Service-message tag (e.g. "pinned_message") when the gateway
    /// recognises the system action. Absent on ordinary messages.
    #[serde(default)]
    pub service: Option<String>,
}

impl RawMessage {
    /// True when this message signals users joining the group.
    pub fn is_join_event(&self) -> bool {
        !self.new_chat_members.is_empty()
    }
}

/// One emoji reaction to a message, as fetched from the gateway.
/// `date` is epoch seconds; the reactor id may be absent (anonymous
/// or channel reactions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReaction {
    pub date: i64,
    pub emoticon: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Sub-classification of a content message that carries no user-visible
/// payload (no text, no poll, no media).
///
/// Open set: known service kinds get their own variant, everything else
/// falls through to [`SystemAction::Other`]. New kinds can be added here
/// without touching the classifier's callers — the stored column is the
/// rendered label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAction {
    PinnedMessage,
    TitleChanged,
    TopicCreated,
    Other,
}

impl std::fmt::Display for SystemAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SystemAction::PinnedMessage => "message pinned",
            SystemAction::TitleChanged => "chat title changed",
            SystemAction::TopicCreated => "topic created",
            SystemAction::Other => "other system actions performed",
        };
        write!(f, "{s}")
    }
}

/// Row shape for the `chat_messages` table.
///
/// `system_action` is set exactly when `text` is empty and both poll and
/// media are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRecord {
    pub msg_id: i64,
    pub from: Option<String>,
    pub from_id: Option<String>,
    /// RFC 3339 message timestamp.
    pub datetime: String,
    /// text + caption, either absent part treated as "".
    pub text: String,
    pub reply_to_message_id: Option<i64>,
    pub poll_question: Option<String>,
    pub poll_total_voters: Option<i64>,
    pub media_type: Option<String>,
    pub system_action: Option<SystemAction>,
}

/// Row shape for the `member_list` table. The three status flags are
/// always false at creation; operators flip them by hand downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    pub user_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// RFC 3339 timestamp of the join-event message.
    pub join_date: String,
    pub is_mgmt: bool,
    pub is_kin: bool,
    pub left_the_group: bool,
}

/// Row shape for the `chat_reactions` table.
///
/// `reaction_id` is `"{msg_id}-{ordinal}"` where the ordinal counts DOWN
/// from the reaction-list length. Unique within one run's fetch of a
/// message, but not stable if the same message were ever re-fetched —
/// kept as-is until downstream consumers confirm nothing depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub reaction_id: String,
    pub msg_id: i64,
    /// RFC 3339, converted from the provider's epoch seconds.
    pub datetime: String,
    pub reaction: String,
    pub user_id: Option<String>,
    /// Resolved from the namelist; None only when `user_id` is None.
    pub username: Option<String>,
}
