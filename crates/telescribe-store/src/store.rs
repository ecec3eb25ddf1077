use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use telescribe_core::types::{ChatMessageRecord, MemberRecord, ReactionRecord};

use crate::db::init_db;
use crate::error::Result;

/// Handle over the mirror database.
///
/// Single writer, no shared state: one run of the batch job owns the
/// connection exclusively, so no Mutex is needed here.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file and run migrations.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Self::new(conn)
    }

    /// Wrap an existing connection (tests use an in-memory one).
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// The high-water mark: maximum message id fetched by any committed
    /// run, 0 on a fresh database.
    ///
    /// Read from the `sync_state` row, which tracks join-event messages
    /// too. Databases written before that table existed fall back to
    /// MAX(msg_id) over `chat_messages`.
    pub fn high_water_mark(&self) -> Result<i64> {
        let stored: Option<i64> = self
            .conn
            .query_row("SELECT high_water FROM sync_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        if let Some(mark) = stored {
            return Ok(mark);
        }
        let max: Option<i64> =
            self.conn
                .query_row("SELECT MAX(msg_id) FROM chat_messages", [], |row| {
                    row.get(0)
                })?;
        Ok(max.unwrap_or(0))
    }

    /// Full member table, insertion order. The namelist is rebuilt from
    /// this every run rather than maintained incrementally.
    pub fn all_members(&self) -> Result<Vec<MemberRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, username, first_name, last_name, join_date,
                    is_mgmt, is_kin, left_the_group
             FROM member_list ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(MemberRecord {
                user_id: row.get(0)?,
                username: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                join_date: row.get(4)?,
                is_mgmt: row.get(5)?,
                is_kin: row.get(6)?,
                left_the_group: row.get(7)?,
            })
        })?;
        let mut members = Vec::new();
        for row in rows {
            members.push(row?);
        }
        Ok(members)
    }

    /// Persist one run's output as a single transaction, advancing the
    /// cursor to `high_water` (the run's top fetched message id).
    ///
    /// Messages, members, reactions and the cursor commit together or
    /// not at all, so a failed run leaves the high-water mark untouched
    /// and the next run simply redoes the work.
    pub fn commit_batch(
        &mut self,
        messages: &[ChatMessageRecord],
        members: &[MemberRecord],
        reactions: &[ReactionRecord],
        high_water: i64,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO sync_state (id, high_water) VALUES (1, ?1)",
            [high_water],
        )?;

        for m in messages {
            tx.execute(
                "INSERT INTO chat_messages
                 (msg_id, from_username, from_id, datetime, text,
                  reply_to_message_id, poll_question, poll_total_voters,
                  media_type, system_action)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
                rusqlite::params![
                    m.msg_id,
                    m.from,
                    m.from_id,
                    m.datetime,
                    m.text,
                    m.reply_to_message_id,
                    m.poll_question,
                    m.poll_total_voters,
                    m.media_type,
                    m.system_action.as_ref().map(|a| a.to_string()),
                ],
            )?;
        }

        for m in members {
            tx.execute(
                "INSERT INTO member_list
                 (user_id, username, first_name, last_name, join_date,
                  is_mgmt, is_kin, left_the_group)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
                rusqlite::params![
                    m.user_id,
                    m.username,
                    m.first_name,
                    m.last_name,
                    m.join_date,
                    m.is_mgmt,
                    m.is_kin,
                    m.left_the_group,
                ],
            )?;
        }

        for r in reactions {
            tx.execute(
                "INSERT INTO chat_reactions
                 (reaction_id, msg_id, datetime, reaction, user_id, username)
                 VALUES (?1,?2,?3,?4,?5,?6)",
                rusqlite::params![
                    r.reaction_id,
                    r.msg_id,
                    r.datetime,
                    r.reaction,
                    r.user_id,
                    r.username,
                ],
            )?;
        }

        tx.commit()?;
        info!(
            messages = messages.len(),
            members = members.len(),
            reactions = reactions.len(),
            "batch committed"
        );
        Ok(())
    }

    /// Row counts per table, for tests and operator diagnostics.
    pub fn counts(&self) -> Result<(i64, i64, i64)> {
        let messages =
            self.conn
                .query_row("SELECT COUNT(*) FROM chat_messages", [], |row| row.get(0))?;
        let members =
            self.conn
                .query_row("SELECT COUNT(*) FROM member_list", [], |row| row.get(0))?;
        let reactions =
            self.conn
                .query_row("SELECT COUNT(*) FROM chat_reactions", [], |row| row.get(0))?;
        debug!(messages, members, reactions, "table counts");
        Ok((messages, members, reactions))
    }
}
