//! Dumps the Serenity model library: classes, models and configurations.
//!
//! # Usage
//! ```sh
//! cargo run --bin introspect_model -- my-config
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serenity_sdk::application::api::SerenityApiProvider;
use serenity_sdk::config::{SdkEnvConfig, load_local_config};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::prelude::*;

const SFRM_CONFIG: &str = "risk.factor.regression.SLM.MT";

#[derive(Parser)]
#[command(author, version, about = "List Serenity model metadata", long_about = None)]
struct Cli {
    /// Name of the connection config, without the .json suffix
    config_id: String,

    /// Directory holding connection configs
    #[arg(long)]
    config_dir: Option<PathBuf>,
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

    let api_provider = SerenityApiProvider::connect(config, &env_config);
    let model_meta = api_provider
        .model()
        .load_model_metadata(None)
        .await
        .context("Failed to load model metadata")?;

    println!("\nAvailable Serenity model classes:");
    for model_class in model_meta.get_model_class_names() {
        println!("\t{}", model_class);
    }
    println!("\nAvailable models:");
    for model in model_meta.get_model_names() {
        println!("\t{}", model);
    }
    println!("\nAvailable model configurations:");
    for model_config in model_meta.get_model_configuration_names() {
        println!("\t{}", model_config);
    }

    let sfrm_id = model_meta
        .get_model_configuration_id(SFRM_CONFIG)
        .context("SFRM model configuration not published")?;
    println!("\nSFRM model configuration ID: {}", sfrm_id);

    Ok(())
}
