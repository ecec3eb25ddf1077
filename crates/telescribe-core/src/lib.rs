//! `telescribe-core` — shared types and configuration.
//!
//! Holds the raw provider-side message shapes, the three persisted record
//! shapes (`chat_messages`, `member_list`, `chat_reactions` rows) and the
//! figment-based config loader used by the batch binary.

pub mod config;
pub mod error;
pub mod types;

pub use config::TelescribeConfig;
pub use error::ConfigError;
