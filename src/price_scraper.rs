use chrono::Local;
use log::{info, warn};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::errors::ScrapeError;
use crate::extract::{extract_all, extract_number, extract_text, without_nulls};
use crate::pipeline::PriceSource;
use crate::requests::RequestClient;

pub const GOLD_PAGE_URL: &str = "http://ajc.com.vn";

// The price table keeps this shape on the page; anything else means the
// capture yields nothing.
const PRICE_ROW_SELECTOR: &str =
    r#"div[data-action="others/OthersHome/priceGold"] div.table-responsive table tbody tr"#;

/// Minute-precision capture timestamp, e.g. "08/07/2026, 09:30".
pub const CAPTURE_TIME_FORMAT: &str = "%m/%d/%Y, %I:%M";

/// One scalar destined for a sheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// One capture's worth of ordered field values.
pub type Row = Vec<CellValue>;

/// A labeled price pair for one gold category.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub category: String,
    pub purchase_price: f64,
    pub sell_price: f64,
}

/// Which table rows make it into the capture.
#[derive(Debug, Clone)]
pub enum RowSelection {
    /// Purchase and sell text of every row.
    EveryRow,
    /// Only rows whose label contains one of these names (case-sensitive),
    /// as labeled numeric quotes.
    Categories(Vec<String>),
}

pub struct PriceScraper {
    pub url: String,
    pub selection: RowSelection,
    client: RequestClient,
}

impl PriceScraper {
    pub fn new(url: String, selection: RowSelection) -> anyhow::Result<Self> {
        Ok(Self {
            url,
            selection,
            client: RequestClient::new()?,
        })
    }
}

impl PriceSource for PriceScraper {
    async fn capture(&self) -> Result<Row, ScrapeError> {
        info!("loading price page: {}", self.url);
        let body = self.client.fetch_url_body(&self.url).await?;
        let document = Html::parse_document(&body);
        let row = extract_price_row(&document, &self.selection, capture_timestamp());
        if row.is_empty() {
            warn!("price table not found on {}, nothing to append", self.url);
        }
        Ok(row)
    }
}

pub fn capture_timestamp() -> String {
    Local::now().format(CAPTURE_TIME_FORMAT).to_string()
}

/// Labeled quotes for every table row whose category matches the allow-list.
pub fn extract_quotes(document: &Html, allow_list: &[String]) -> Vec<PriceQuote> {
    let row_selector = Selector::parse(PRICE_ROW_SELECTOR).unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut quotes = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }
        let Some(category) = extract_text(&cells[0]) else {
            continue;
        };
        if !allow_list.iter().any(|name| category.contains(name.as_str())) {
            continue;
        }
        let (Some(purchase_price), Some(sell_price)) =
            (extract_number(&cells[1]), extract_number(&cells[2]))
        else {
            continue;
        };
        quotes.push(PriceQuote {
            category,
            purchase_price,
            sell_price,
        });
    }
    quotes
}

/// Turn a rendered page into one Row, timestamp first. A page without the
/// expected table yields an empty Row, not an error.
pub fn extract_price_row(document: &Html, selection: &RowSelection, captured_at: String) -> Row {
    let values: Vec<CellValue> = match selection {
        RowSelection::EveryRow => {
            let row_selector = Selector::parse(PRICE_ROW_SELECTOR).unwrap();
            let cell_selector = Selector::parse("td").unwrap();
            let mut values = Vec::new();
            for row in document.select(&row_selector) {
                let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
                if cells.len() < 3 {
                    continue;
                }
                let prices =
                    without_nulls(extract_all(cells[1..3].iter().copied(), extract_text));
                if prices.len() < 2 {
                    continue;
                }
                values.extend(prices.into_iter().map(CellValue::Text));
            }
            values
        }
        RowSelection::Categories(allow_list) => extract_quotes(document, allow_list)
            .into_iter()
            .flat_map(|quote| {
                [
                    CellValue::Text(quote.category),
                    CellValue::Number(quote.purchase_price),
                    CellValue::Number(quote.sell_price),
                ]
            })
            .collect(),
    };

    if values.is_empty() {
        return Row::new();
    }
    let mut row = Vec::with_capacity(values.len() + 1);
    row.push(CellValue::Text(captured_at));
    row.extend(values);
    row
}
