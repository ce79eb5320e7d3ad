//! Command handlers

pub mod config;
pub mod quote;

use anyhow::{Context, Result};

use quotes_core::{Config, HttpApi, LoadStrategy, QuoteSync, SortMode};

/// Open a session against the configured backend and load every quote
pub async fn open_session(config: &Config, sort: SortMode) -> Result<QuoteSync<HttpApi>> {
    let api = HttpApi::new(config).context("Failed to create API client")?;
    let mut sync = QuoteSync::new(api, sort).with_strategy(LoadStrategy::from_config(config));
    sync.load()
        .await
        .with_context(|| format!("Failed to load quotes from {}", config.base_url()))?;
    Ok(sync)
}
