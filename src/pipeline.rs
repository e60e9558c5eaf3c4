use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::cursor::CellRange;
use crate::errors::ScrapeError;
use crate::price_scraper::Row;
use crate::sheets::RowAppender;

/// Page-capture seam the orchestrator drives once per tick.
pub trait PriceSource {
    fn capture(&self) -> impl Future<Output = Result<Row, ScrapeError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    /// Faulted describes the tick that just ended; it is not sticky, the
    /// next trigger starts a fresh Running cycle.
    Faulted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Appended { rows: u32, next_range: CellRange },
    NoRows,
    /// Produced by the orchestrator when a trigger lands mid-run.
    Dropped,
    Failed { code: u16, message: String },
}

/// One extract-then-append cycle over a single in-memory cursor. The cursor
/// only moves on a confirmed write, by exactly the row count the
/// destination reported.
pub struct Pipeline<S, W> {
    source: S,
    appender: W,
    cursor: CellRange,
    state: PipelineState,
}

impl<S: PriceSource, W: RowAppender> Pipeline<S, W> {
    pub fn new(source: S, appender: W, initial_range: CellRange) -> Self {
        Pipeline {
            source,
            appender,
            cursor: initial_range,
            state: PipelineState::Idle,
        }
    }

    pub fn cursor(&self) -> &CellRange {
        &self.cursor
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub async fn tick(&mut self) -> TickOutcome {
        self.state = PipelineState::Running;
        info!("capture tick started, append window is {}", self.cursor);

        let outcome = self.run_stages().await;
        match &outcome {
            TickOutcome::Appended { rows, next_range } => {
                info!("appended {} row(s), next append window is {}", rows, next_range);
                self.state = PipelineState::Idle;
            }
            TickOutcome::NoRows => {
                info!("nothing extracted, append window stays at {}", self.cursor);
                self.state = PipelineState::Idle;
            }
            TickOutcome::Failed { code, message } => {
                error!("tick faulted ({}): {}", code, message);
                self.state = PipelineState::Faulted(message.clone());
            }
            // Dropped is produced by the orchestrator, never by a running tick.
            TickOutcome::Dropped => {}
        }
        outcome
    }

    async fn run_stages(&mut self) -> TickOutcome {
        let row = match self.source.capture().await {
            Ok(row) => row,
            Err(e) => {
                return TickOutcome::Failed {
                    code: e.status,
                    message: e.message,
                };
            }
        };

        // An empty capture must not touch the destination or the cursor.
        if row.is_empty() {
            return TickOutcome::NoRows;
        }

        match self.appender.append(&self.cursor, &row).await {
            Ok(result) => {
                self.cursor = self.cursor.advance(result.updated_row_count);
                TickOutcome::Appended {
                    rows: result.updated_row_count,
                    next_range: self.cursor.clone(),
                }
            }
            Err(e) => TickOutcome::Failed {
                code: e.status,
                message: e.message,
            },
        }
    }
}

/// Serializes ticks over the pipeline. The cursor is single-instance
/// in-memory state, so two interleaved runs reading the same window would
/// silently duplicate or overwrite rows; a trigger arriving mid-run is
/// dropped instead of queued.
pub struct Orchestrator<S, W> {
    pipeline: Mutex<Pipeline<S, W>>,
}

impl<S: PriceSource, W: RowAppender> Orchestrator<S, W> {
    pub fn new(pipeline: Pipeline<S, W>) -> Self {
        Orchestrator {
            pipeline: Mutex::new(pipeline),
        }
    }

    pub async fn trigger(&self) -> TickOutcome {
        match self.pipeline.try_lock() {
            Ok(mut pipeline) => pipeline.tick().await,
            Err(_) => {
                warn!("previous tick still running, dropping this trigger");
                TickOutcome::Dropped
            }
        }
    }

    pub async fn current_range(&self) -> CellRange {
        self.pipeline.lock().await.cursor().clone()
    }
}
