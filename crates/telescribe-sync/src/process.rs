use telescribe_core::types::{ChatMessageRecord, MemberRecord, RawMessage};
use tracing::debug;

use crate::classify::{classify, Classified};

/// Classify a batch of raw messages and split the results.
///
/// Pure transform: no provider or store calls. Message order only
/// affects output order; each message is classified independently.
pub fn process_batch(messages: &[RawMessage]) -> (Vec<ChatMessageRecord>, Vec<MemberRecord>) {
    let mut chat_messages = Vec::new();
    let mut new_members = Vec::new();

    for msg in messages {
        match classify(msg) {
            Classified::Joins(members) => new_members.extend(members),
            Classified::Chat(record) => chat_messages.push(record),
        }
    }

    debug!(
        input = messages.len(),
        chat = chat_messages.len(),
        joined = new_members.len(),
        "batch processed"
    );
    (chat_messages, new_members)
}
