//! readmeai - loads the readme-ai configuration.
//!
//! Usage: `readmeai [CONFIG] [REPOSITORY]`
//!
//! Loads `CONFIG` (default `config.toml`, relative to the settings root),
//! optionally replaces the configured repository, merges the helper tables
//! and prints the result as JSON.

use anyhow::Context;
use readmeai_config::persistence::DEFAULT_CONFIG_FILE;
use readmeai_config::{AppConfig, ConfigHelper};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    let mut config = AppConfig::load(&path)
        .with_context(|| format!("failed to load configuration from '{path}'"))?;

    if let Some(repository) = args.next() {
        config
            .set_repository(&repository)
            .with_context(|| format!("invalid repository '{repository}'"))?;
    }

    let helper = ConfigHelper::load(config).context("failed to merge helper settings")?;
    tracing::debug!(
        dependency_files = helper.tables.dependency_files.len(),
        languages = helper.tables.language_names.len(),
        "helper settings merged"
    );

    println!("{}", serde_json::to_string_pretty(&helper)?);
    Ok(())
}
