use telescribe_core::types::{
    user_key, ChatMessageRecord, MemberRecord, RawMessage, RawUser, SystemAction,
};

/// Outcome of classifying one raw message. A message is either a join
/// event or a content message, never both.
#[derive(Debug, Clone)]
pub enum Classified {
    /// One record per user listed in the join event. Produces no chat
    /// message row.
    Joins(Vec<MemberRecord>),
    /// An ordinary content message (possibly an other-system message,
    /// carried in the record's `system_action`).
    Chat(ChatMessageRecord),
}

/// Pure classification + field extraction for one raw message.
pub fn classify(msg: &RawMessage) -> Classified {
    if msg.is_join_event() {
        let joined_at = msg.date.to_rfc3339();
        let members = msg
            .new_chat_members
            .iter()
            .map(|user| new_member(user, &joined_at))
            .collect();
        return Classified::Joins(members);
    }

    let text = format!(
        "{}{}",
        msg.text.as_deref().unwrap_or(""),
        msg.caption.as_deref().unwrap_or("")
    );

    let mut record = ChatMessageRecord {
        msg_id: msg.id,
        from: msg.from.as_ref().and_then(|u| u.username.clone()),
        from_id: msg.from.as_ref().map(|u| user_key(u.id)),
        datetime: msg.date.to_rfc3339(),
        text,
        reply_to_message_id: msg.reply_to_message_id,
        poll_question: msg.poll.as_ref().map(|p| p.question.clone()),
        poll_total_voters: msg.poll.as_ref().map(|p| p.total_voter_count),
        media_type: msg.media_type.clone(),
        system_action: None,
    };

    // No user-visible payload at all: this is some other system message
    // (pinned message, title change, topic creation, ...).
    if record.text.is_empty() && record.poll_question.is_none() && record.media_type.is_none() {
        record.system_action = Some(system_action(msg));
    }

    Classified::Chat(record)
}

fn new_member(user: &RawUser, joined_at: &str) -> MemberRecord {
    MemberRecord {
        user_id: user_key(user.id),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        join_date: joined_at.to_string(),
        is_mgmt: false,
        is_kin: false,
        left_the_group: false,
    }
}

/// Sub-classify a payload-free system message from the gateway's service
/// tag. Unknown or missing tags fall through to the catch-all.
fn system_action(msg: &RawMessage) -> SystemAction {
    match msg.service.as_deref() {
        Some("pinned_message") => SystemAction::PinnedMessage,
        Some("new_chat_title") => SystemAction::TitleChanged,
        Some("topic_created") => SystemAction::TopicCreated,
        _ => SystemAction::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn raw(id: i64) -> RawMessage {
        RawMessage {
            id,
            date: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
            from: Some(RawUser {
                id: 111,
                username: Some("alice".into()),
                first_name: Some("Alice".into()),
                last_name: None,
            }),
            text: None,
            caption: None,
            reply_to_message_id: None,
            poll: None,
            media_type: None,
            new_chat_members: Vec::new(),
            service: None,
        }
    }

    #[test]
    fn join_event_yields_one_member_per_user_and_no_chat_record() {
        let mut msg = raw(10);
        msg.new_chat_members = vec![
            RawUser {
                id: 5,
                username: Some("bob".into()),
                first_name: Some("Bob".into()),
                last_name: Some("B".into()),
            },
            RawUser {
                id: 6,
                username: None,
                first_name: None,
                last_name: None,
            },
        ];
        match classify(&msg) {
            Classified::Joins(members) => {
                assert_eq!(members.len(), 2);
                assert_eq!(members[0].user_id, "user5");
                assert_eq!(members[0].username.as_deref(), Some("bob"));
                assert_eq!(members[0].join_date, msg.date.to_rfc3339());
                assert!(!members[0].is_mgmt && !members[0].is_kin);
                assert!(!members[1].left_the_group);
                assert_eq!(members[1].user_id, "user6");
            }
            Classified::Chat(_) => panic!("join event classified as chat"),
        }
    }

    #[test]
    fn text_and_caption_concatenate_with_absent_as_empty() {
        let mut msg = raw(11);
        msg.text = Some("hello".into());
        msg.caption = Some(" world".into());
        match classify(&msg) {
            Classified::Chat(rec) => assert_eq!(rec.text, "hello world"),
            _ => panic!(),
        }

        let mut msg = raw(12);
        msg.caption = Some("caption only".into());
        match classify(&msg) {
            Classified::Chat(rec) => assert_eq!(rec.text, "caption only"),
            _ => panic!(),
        }
    }

    #[test]
    fn text_message_keeps_system_action_null() {
        let mut msg = raw(13);
        msg.text = Some("hello".into());
        match classify(&msg) {
            Classified::Chat(rec) => assert!(rec.system_action.is_none()),
            _ => panic!(),
        }
    }

    #[test]
    fn poll_or_media_keeps_system_action_null() {
        let mut msg = raw(14);
        msg.poll = Some(telescribe_core::types::RawPoll {
            question: "lunch?".into(),
            total_voter_count: 7,
        });
        match classify(&msg) {
            Classified::Chat(rec) => {
                assert!(rec.system_action.is_none());
                assert_eq!(rec.poll_question.as_deref(), Some("lunch?"));
                assert_eq!(rec.poll_total_voters, Some(7));
            }
            _ => panic!(),
        }

        let mut msg = raw(15);
        msg.media_type = Some("photo".into());
        match classify(&msg) {
            Classified::Chat(rec) => assert!(rec.system_action.is_none()),
            _ => panic!(),
        }
    }

    #[test]
    fn empty_payload_gets_catch_all_system_action() {
        let msg = raw(16);
        match classify(&msg) {
            Classified::Chat(rec) => {
                assert_eq!(rec.system_action, Some(SystemAction::Other));
                assert_eq!(
                    rec.system_action.unwrap().to_string(),
                    "other system actions performed"
                );
            }
            _ => panic!(),
        }
    }

    #[test]
    fn known_service_tags_get_their_own_variant() {
        let mut msg = raw(17);
        msg.service = Some("pinned_message".into());
        match classify(&msg) {
            Classified::Chat(rec) => {
                assert_eq!(rec.system_action, Some(SystemAction::PinnedMessage))
            }
            _ => panic!(),
        }

        let mut msg = raw(18);
        msg.service = Some("some_future_kind".into());
        match classify(&msg) {
            Classified::Chat(rec) => assert_eq!(rec.system_action, Some(SystemAction::Other)),
            _ => panic!(),
        }
    }

    #[test]
    fn anonymous_sender_leaves_from_fields_null() {
        let mut msg = raw(19);
        msg.from = None;
        msg.text = Some("posted via channel".into());
        match classify(&msg) {
            Classified::Chat(rec) => {
                assert!(rec.from.is_none());
                assert!(rec.from_id.is_none());
            }
            _ => panic!(),
        }
    }
}
