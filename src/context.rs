use std::sync::Arc;

use crate::config::WatchConfig;
use crate::pipeline::{Orchestrator, Pipeline};
use crate::price_scraper::PriceScraper;
use crate::sheets::SheetsClient;

/// Everything a running watcher needs, wired from the environment.
pub struct WatchContext {
    pub config: WatchConfig,
    pub orchestrator: Arc<Orchestrator<PriceScraper, SheetsClient>>,
}

impl WatchContext {
    pub fn new() -> anyhow::Result<Self> {
        let config = WatchConfig::new()?;
        Self::from_config(config)
    }

    pub fn from_config(config: WatchConfig) -> anyhow::Result<Self> {
        let scraper = PriceScraper::new(config.page_url.clone(), config.selection.clone())?;
        let sheets_client = SheetsClient::new(config.sheets.clone())?;
        let pipeline = Pipeline::new(scraper, sheets_client, config.initial_range.clone());
        Ok(WatchContext {
            config,
            orchestrator: Arc::new(Orchestrator::new(pipeline)),
        })
    }
}
