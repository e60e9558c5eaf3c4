use serde::Serialize;
use serde_json::{Value, json};

use crate::pipeline::TickOutcome;

/// The JSON wrapping convention for anything that exposes a tick over HTTP:
/// `{"status":"success","data":…}` or `{"status":"failure","code":…,"message":…}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success { data: Value },
    Failure { code: u16, message: String },
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Envelope::Success { data }
    }

    pub fn failure(code: u16) -> Self {
        let message = if code == 404 {
            "Not found"
        } else {
            "Request failed"
        };
        Envelope::Failure {
            code,
            message: message.to_string(),
        }
    }
}

impl TickOutcome {
    pub fn into_envelope(self) -> Envelope {
        match self {
            TickOutcome::Appended { rows, next_range } => Envelope::success(json!({
                "appendedRows": rows,
                "nextRange": next_range.a1(),
            })),
            TickOutcome::NoRows => Envelope::success(json!({ "appendedRows": 0 })),
            TickOutcome::Dropped => Envelope::success(json!({ "dropped": true })),
            TickOutcome::Failed { code, .. } => Envelope::failure(code),
        }
    }
}
