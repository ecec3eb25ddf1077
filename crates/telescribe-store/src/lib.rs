//! `telescribe-store` — SQLite persistence for the mirrored group.
//!
//! Three append-only tables: `chat_messages`, `member_list` and
//! `chat_reactions`. Rows are never updated or deleted by the sync job;
//! the maximum stored message id is the sync cursor.

pub mod db;
pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::Store;
