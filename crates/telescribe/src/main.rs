use std::path::Path;

use tracing::info;

use telescribe_core::TelescribeConfig;
use telescribe_store::Store;
use telescribe_sync::run_sync;
use telescribe_telegram::GatewayClient;

/// One batch catch-up run: no arguments, exit 0 on success, nonzero on
/// any fatal error (store failures, gateway auth/connect failures, or a
/// reactor missing from the member directory).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "telescribe=info".into()),
        )
        .init();

    // config: TELESCRIBE_CONFIG env > ~/.telescribe/telescribe.toml
    let config_path = std::env::var("TELESCRIBE_CONFIG").ok();
    let config = TelescribeConfig::load(config_path.as_deref())?;

    ensure_parent_dir(&config.database.path);
    info!(path = %config.database.path, "opening mirror database");
    let mut store = Store::open(&config.database.path)?;

    let gateway = GatewayClient::new(config.gateway.url.clone(), config.gateway.token.clone());

    let report = run_sync(&gateway, &mut store, config.group.id, &config.sync).await?;
    info!(
        new_messages = report.new_messages,
        chat_messages = report.chat_messages,
        new_members = report.new_members,
        reactions = report.reactions,
        "sync finished"
    );
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
