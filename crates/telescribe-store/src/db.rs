use rusqlite::{Connection, Result};

/// Initialise the mirror tables. Safe to call on every startup (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    create_chat_messages_table(conn)?;
    create_member_list_table(conn)?;
    create_chat_reactions_table(conn)?;
    create_sync_state_table(conn)?;
    Ok(())
}

/// One row per content message. `msg_id` comes from the provider and is
/// strictly increasing per group, so it doubles as the primary key and
/// the high-water mark.
fn create_chat_messages_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS chat_messages (
            msg_id                  INTEGER PRIMARY KEY,
            from_username           TEXT,
            from_id                 TEXT,
            datetime                TEXT NOT NULL,
            text                    TEXT NOT NULL DEFAULT '',
            reply_to_message_id     INTEGER,
            poll_question           TEXT,
            poll_total_voters       INTEGER,
            media_type              TEXT,
            system_action           TEXT
        );",
    )
}

/// One row per observed join event. Deliberately no UNIQUE constraint on
/// user_id: a member who leaves and rejoins produces a second row, and
/// the namelist applies last-write-wins when it is rebuilt.
fn create_member_list_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS member_list (
            user_id         TEXT NOT NULL,
            username        TEXT,
            first_name      TEXT,
            last_name       TEXT,
            join_date       TEXT NOT NULL,
            is_mgmt         INTEGER NOT NULL DEFAULT 0,
            is_kin          INTEGER NOT NULL DEFAULT 0,
            left_the_group  INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_member_user
            ON member_list(user_id);",
    )
}

/// Single-row cursor table. Holds the maximum message id any committed
/// run has fetched — including join-event messages, which produce no
/// chat_messages row and so would never advance a MAX(msg_id) cursor.
fn create_sync_state_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sync_state (
            id          INTEGER PRIMARY KEY CHECK (id = 1),
            high_water  INTEGER NOT NULL
        );",
    )
}

fn create_chat_reactions_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS chat_reactions (
            reaction_id     TEXT PRIMARY KEY,
            msg_id          INTEGER NOT NULL,
            datetime        TEXT NOT NULL,
            reaction        TEXT NOT NULL,
            user_id         TEXT,
            username        TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_reactions_msg
            ON chat_reactions(msg_id);",
    )
}
