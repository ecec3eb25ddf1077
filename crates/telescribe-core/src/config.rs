use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// History-scan hard cap per run.
pub const DEFAULT_HISTORY_CAP: u32 = 2000;
/// Messages per history page request.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Reactions fetched per message.
pub const DEFAULT_REACTION_LIMIT: u32 = 30;

/// Top-level config (telescribe.toml + TELESCRIBE_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelescribeConfig {
    pub gateway: GatewayConfig,
    pub group: GroupConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// HTTP gateway endpoint and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    pub token: String,
}

/// The single mirrored group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Batch-size knobs for one sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Stop scanning history after this many messages even if the
    /// high-water mark was not reached (first-run bound).
    #[serde(default = "default_history_cap")]
    pub history_cap: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_reaction_limit")]
    pub reaction_limit: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            page_size: DEFAULT_PAGE_SIZE,
            reaction_limit: DEFAULT_REACTION_LIMIT,
        }
    }
}

impl TelescribeConfig {
    /// Load configuration, merged in priority order:
    ///   1. explicit path argument
    ///   2. TELESCRIBE_CONFIG env var
    ///   3. ~/.telescribe/telescribe.toml
    ///
    /// Env vars prefixed TELESCRIBE_ override file values; the section
    /// separator is a double underscore so multi-word keys stay intact
    /// (TELESCRIBE_SYNC__HISTORY_CAP overrides [sync] history_cap).
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: TelescribeConfig = Self::figment(&path)
            .extract()
            .map_err(|e| ConfigError(e.to_string()))?;

        Ok(config)
    }

    fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TELESCRIBE_").split("__"))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.telescribe/telescribe.toml", home)
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.telescribe/telescribe.db", home)
}

fn default_history_cap() -> u32 {
    DEFAULT_HISTORY_CAP
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_reaction_limit() -> u32 {
    DEFAULT_REACTION_LIMIT
}
