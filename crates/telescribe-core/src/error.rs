use thiserror::Error;

/// Configuration could not be loaded or parsed.
#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);
