use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};

use crate::cursor::{CellRange, CellRangeParser};
use crate::price_scraper::{GOLD_PAGE_URL, RowSelection};
use crate::sheets::SheetsConfig;

/// The env config env vars needed for watching.
#[derive(Debug, Deserialize)]
pub struct WatchEnv {
    spreadsheet_id: String,
    sheets_access_token: String,
    #[serde(default = "default_page_url")]
    gold_page_url: String,
    #[serde(default = "default_worksheet")]
    worksheet: String,
    #[serde(default = "default_start_cell")]
    start_cell: String,
    #[serde(default = "default_end_cell")]
    end_cell: String,
    #[serde(default = "default_interval_minutes")]
    scrape_interval_minutes: u64,
    /// Comma-separated category allow-list; unset captures every row.
    #[serde(default)]
    category_filter: Option<String>,
}

fn default_page_url() -> String {
    GOLD_PAGE_URL.to_string()
}

fn default_worksheet() -> String {
    "Sheet1".to_string()
}

fn default_start_cell() -> String {
    "A4".to_string()
}

fn default_end_cell() -> String {
    "S4".to_string()
}

fn default_interval_minutes() -> u64 {
    30
}

pub struct WatchConfig {
    pub page_url: String,
    pub selection: RowSelection,
    pub initial_range: CellRange,
    pub interval: Duration,
    pub sheets: SheetsConfig,
}

impl WatchConfig {
    pub fn new() -> anyhow::Result<Self> {
        let watch_env = WatchEnv::load_from_env()?;
        Self::from_env_values(watch_env)
    }

    fn from_env_values(env: WatchEnv) -> anyhow::Result<Self> {
        let parser = CellRangeParser::new()?;
        let initial_range = parser.parse_range(&env.start_cell, &env.end_cell)?;

        let selection = match &env.category_filter {
            Some(filter) if !filter.trim().is_empty() => RowSelection::Categories(
                filter
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect(),
            ),
            _ => RowSelection::EveryRow,
        };

        Ok(Self {
            page_url: env.gold_page_url,
            selection,
            initial_range,
            interval: Duration::from_secs(env.scrape_interval_minutes * 60),
            sheets: SheetsConfig {
                spreadsheet_id: env.spreadsheet_id,
                worksheet: env.worksheet,
                access_token: env.sheets_access_token,
            },
        })
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
