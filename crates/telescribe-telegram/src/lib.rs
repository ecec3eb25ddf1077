//! `telescribe-telegram` — chat-provider access for the sync job.
//!
//! The core pipeline talks to Telegram through the [`ChatProvider`]
//! trait; [`GatewayClient`] implements it against an HTTP/JSON MTProto
//! gateway. Session management, rate limiting and transport retries are
//! the gateway's problem — this crate only shapes requests and maps the
//! error taxonomy the pipeline cares about.

pub mod error;
pub mod gateway;
pub mod provider;

pub use error::ProviderError;
pub use gateway::GatewayClient;
pub use provider::{ChatProvider, PeerHandle};
