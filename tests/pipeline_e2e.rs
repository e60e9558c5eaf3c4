use std::sync::{Arc, Mutex};

use scraper::Html;

use goldwatch::price_scraper::{extract_price_row, extract_quotes};
use goldwatch::{
    AppendResult, CellRange, CellRangeParser, CellValue, Pipeline, PriceQuote, PriceSource, Row,
    RowAppender, RowSelection, ScrapeError, TickOutcome, WriteError,
};

const PRICE_PAGE: &str = r#"
    <html><body>
    <div data-action="others/OthersHome/priceGold">
      <div class="table-responsive"><table><tbody>
        <tr><td>Type A</td><td>1000</td><td>1010</td></tr>
        <tr><td>Type B</td><td>2000</td><td>2010</td></tr>
      </tbody></table></div>
    </div>
    </body></html>"#;

const CAPTURED_AT: &str = "01/02/2026, 03:04";

/// Captures from a canned page instead of the network.
struct PageSource {
    html: String,
    selection: RowSelection,
}

impl PriceSource for PageSource {
    async fn capture(&self) -> Result<Row, ScrapeError> {
        let document = Html::parse_document(&self.html);
        Ok(extract_price_row(
            &document,
            &self.selection,
            CAPTURED_AT.to_string(),
        ))
    }
}

#[derive(Clone)]
struct RecordingAppender {
    calls: Arc<Mutex<Vec<(String, Row)>>>,
    reported_rows: u32,
}

impl RecordingAppender {
    fn reporting(reported_rows: u32) -> Self {
        RecordingAppender {
            calls: Arc::new(Mutex::new(Vec::new())),
            reported_rows,
        }
    }
}

impl RowAppender for RecordingAppender {
    async fn append(&self, range: &CellRange, row: &Row) -> Result<AppendResult, WriteError> {
        self.calls.lock().unwrap().push((range.a1(), row.clone()));
        Ok(AppendResult {
            updated_row_count: self.reported_rows,
            http_status: 200,
        })
    }
}

fn initial_range() -> CellRange {
    CellRangeParser::new()
        .unwrap()
        .parse_range("A4", "S4")
        .unwrap()
}

#[test]
fn allow_list_extracts_exactly_the_matching_record() {
    let document = Html::parse_document(PRICE_PAGE);
    let quotes = extract_quotes(&document, &["Type A".to_string()]);
    assert_eq!(
        quotes,
        vec![PriceQuote {
            category: "Type A".to_string(),
            purchase_price: 1000.0,
            sell_price: 1010.0,
        }]
    );
}

#[tokio::test]
async fn capture_append_advance_round_trip() {
    let source = PageSource {
        html: PRICE_PAGE.to_string(),
        selection: RowSelection::Categories(vec!["Type A".to_string()]),
    };
    let appender = RecordingAppender::reporting(1);
    let mut pipeline = Pipeline::new(source, appender.clone(), initial_range());

    let outcome = pipeline.tick().await;

    match outcome {
        TickOutcome::Appended { rows, next_range } => {
            assert_eq!(rows, 1);
            assert_eq!(next_range.a1(), "A5:S5");
        }
        other => panic!("expected an append, got {:?}", other),
    }

    let calls = appender.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (range, row) = &calls[0];
    assert_eq!(range, "A4:S4");
    assert_eq!(
        row,
        &vec![
            CellValue::Text(CAPTURED_AT.to_string()),
            CellValue::Text("Type A".to_string()),
            CellValue::Number(1000.0),
            CellValue::Number(1010.0),
        ]
    );
    assert_eq!(pipeline.cursor().a1(), "A5:S5");
}

#[tokio::test]
async fn empty_page_never_reaches_the_sheet() {
    let source = PageSource {
        html: "<html><body></body></html>".to_string(),
        selection: RowSelection::EveryRow,
    };
    let appender = RecordingAppender::reporting(1);
    let mut pipeline = Pipeline::new(source, appender.clone(), initial_range());

    assert_eq!(pipeline.tick().await, TickOutcome::NoRows);
    assert!(appender.calls.lock().unwrap().is_empty());
    assert_eq!(pipeline.cursor().a1(), "A4:S4");
}

#[tokio::test]
async fn successive_ticks_write_contiguous_windows() {
    let source = PageSource {
        html: PRICE_PAGE.to_string(),
        selection: RowSelection::EveryRow,
    };
    let appender = RecordingAppender::reporting(1);
    let mut pipeline = Pipeline::new(source, appender.clone(), initial_range());

    for _ in 0..3 {
        let outcome = pipeline.tick().await;
        assert!(matches!(outcome, TickOutcome::Appended { .. }));
    }

    let calls = appender.calls.lock().unwrap();
    let ranges: Vec<&str> = calls.iter().map(|(range, _)| range.as_str()).collect();
    assert_eq!(ranges, vec!["A4:S4", "A5:S5", "A6:S6"]);
}
