//! Serenity access check
//!
//! Confirms the configured credentials can reach the refdata, risk and model
//! APIs.
//!
//! # Usage
//! ```sh
//! cargo run --bin check_access -- my-config
//! ```
//!
//! # Environment Variables
//! - `SERENITY_CONFIG_DIR` - Directory holding `{config_id}.json` (default: `~/.serenity`)
//! - `SERENITY_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)

use anyhow::{Context, Result};
use clap::Parser;
use serenity_sdk::config::{SdkEnvConfig, load_local_config};
use serenity_sdk::infrastructure::SerenityClient;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Check access to the Serenity APIs", long_about = None)]
struct Cli {
    /// Name of the connection config, without the .json suffix
    config_id: String,

    /// Directory holding connection configs
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

async fn check_call_nonempty(client: &SerenityClient, api_group: &str, api_path: &str, result_key: &str, description: &str) {
    match client.call_api(api_group, api_path, &[], None, None).await {
        Ok(resp) => {
            let count = resp.get(result_key).and_then(|v| v.as_array()).map_or(0, Vec::len);
            if count > 1 {
                println!("OK - {}", description);
            } else {
                println!("ERR - bad response from {}: {}", description, resp);
            }
        }
        Err(e) => println!("ERR - {} failed: {}", description, e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let env_config = SdkEnvConfig::from_env();
    let config_dir = cli.config_dir.or_else(|| env_config.config_dir.clone());

    let config = load_local_config(&cli.config_id, config_dir.as_deref())
        .with_context(|| format!("Failed to load connection config {}", cli.config_id))?;
    info!("Connecting to {} ({})", config.get_url(), config.env);
    let client = SerenityClient::connect(config, &env_config);

    check_call_nonempty(&client, "refdata", "/asset/summaries", "assetSummary", "Refdata API").await;
    check_call_nonempty(&client, "risk", "/factor/returns", "factorReturns", "Risk API").await;
    check_call_nonempty(&client, "catalog", "/model/modelclasses", "modelClasses", "Model API").await;

    Ok(())
}
