pub mod config;
pub mod context;
pub mod cursor;
pub mod envelope;
pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod price_scraper;
pub mod requests;
pub mod sheets;

pub use context::WatchContext;
pub use cursor::{CellRange, CellRef, CellRangeParser};
pub use envelope::Envelope;
pub use errors::{ScrapeError, WriteError};
pub use pipeline::{Orchestrator, Pipeline, PipelineState, PriceSource, TickOutcome};
pub use price_scraper::{CellValue, PriceQuote, PriceScraper, Row, RowSelection};
pub use sheets::{AppendResult, RowAppender, SheetsClient, SheetsConfig};
