use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};

use crate::cursor::CellRange;
use crate::errors::WriteError;
use crate::price_scraper::Row;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const APPEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub worksheet: String,
    /// Bearer token for the Sheets API; acquiring it is the caller's problem.
    pub access_token: String,
}

/// What the destination reported for one append call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendResult {
    pub updated_row_count: u32,
    pub http_status: u16,
}

/// Destination store seam: append one row at the given window. No retries
/// here; a blind retry without reading destination state back risks a
/// duplicate append, so retry policy stays with the trigger layer.
pub trait RowAppender {
    fn append(
        &self,
        range: &CellRange,
        row: &Row,
    ) -> impl Future<Output = Result<AppendResult, WriteError>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: String,
    major_dimension: &'static str,
    values: [&'a Row; 1],
}

fn append_request_body<'a>(qualified_range: String, row: &'a Row) -> ValueRange<'a> {
    ValueRange {
        range: qualified_range,
        major_dimension: "ROWS",
        values: [row],
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: Option<UpdateSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSummary {
    updated_rows: Option<u32>,
}

pub struct SheetsClient {
    http: Client,
    config: SheetsConfig,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> anyhow::Result<Self> {
        let http = ClientBuilder::new().timeout(APPEND_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    fn append_url(&self, qualified_range: &str) -> String {
        format!(
            "{}/{}/values/{}:append",
            SHEETS_API_BASE, self.config.spreadsheet_id, qualified_range
        )
    }
}

impl RowAppender for SheetsClient {
    async fn append(&self, range: &CellRange, row: &Row) -> Result<AppendResult, WriteError> {
        let qualified = range.qualified(&self.config.worksheet);
        let response = self
            .http
            .post(self.append_url(&qualified))
            .bearer_auth(&self.config.access_token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&append_request_body(qualified.clone(), row))
            .send()
            .await
            .map_err(|e| WriteError::transport(&e))?;

        let http_status = response.status().as_u16();
        if http_status != 200 {
            return Err(WriteError::new(
                http_status,
                format!("append to {} rejected", qualified),
            ));
        }

        let parsed: AppendResponse = response
            .json()
            .await
            .map_err(|e| WriteError::transport(&e))?;
        let updated_row_count = parsed
            .updates
            .and_then(|u| u.updated_rows)
            .unwrap_or(0);

        Ok(AppendResult {
            updated_row_count,
            http_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CellRangeParser;
    use crate::price_scraper::CellValue;
    use serde_json::json;

    #[test]
    fn request_body_matches_values_append_shape() {
        let row: Row = vec![
            CellValue::Text("01/02/2026, 03:04".to_string()),
            CellValue::Text("SJC 9999".to_string()),
            CellValue::Number(1000.0),
            CellValue::Number(1010.0),
        ];
        let body = append_request_body("Sheet1!A4:S4".to_string(), &row);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "range": "Sheet1!A4:S4",
                "majorDimension": "ROWS",
                "values": [["01/02/2026, 03:04", "SJC 9999", 1000.0, 1010.0]],
            })
        );
    }

    #[test]
    fn append_response_reads_updated_rows() {
        let raw = r#"{
            "spreadsheetId": "abc",
            "tableRange": "Sheet1!A1:S3",
            "updates": {
                "updatedRange": "Sheet1!A4:S4",
                "updatedRows": 1,
                "updatedColumns": 4,
                "updatedCells": 4
            }
        }"#;
        let parsed: AppendResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.updates.and_then(|u| u.updated_rows), Some(1));
    }

    #[test]
    fn missing_update_summary_counts_as_zero() {
        let parsed: AppendResponse = serde_json::from_str(r#"{"spreadsheetId": "abc"}"#).unwrap();
        assert_eq!(parsed.updates.and_then(|u| u.updated_rows), None);
    }

    #[test]
    fn append_url_targets_the_qualified_range() {
        let client = SheetsClient::new(SheetsConfig {
            spreadsheet_id: "sheet-id".to_string(),
            worksheet: "Sheet1".to_string(),
            access_token: "token".to_string(),
        })
        .unwrap();
        let range = CellRangeParser::new()
            .unwrap()
            .parse_range("A4", "S4")
            .unwrap();
        assert_eq!(
            client.append_url(&range.qualified("Sheet1")),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/Sheet1!A4:S4:append"
        );
    }
}
