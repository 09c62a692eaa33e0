//! Worker requests (explicit positive/negative preferences).

use chrono::NaiveDate;

/// Whether a [`WorkerRequest`] asks for a shift or asks to avoid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RequestPolarity {
    Positive,
    Negative,
}

/// A worker's explicit request to work, or not work, a shift type over a
/// date range, with a priority used by whichever constraint consumes it.
///
/// The core reserves this interface slot (see `DESIGN.md` for the resolved
/// open question on how positive requests feed the objective) without
/// itself enumerating a "request" constraint in the seven built-in kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerRequest {
    pub worker_id: String,
    pub shift_type_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub polarity: RequestPolarity,
    pub priority: u32,
}

impl WorkerRequest {
    pub fn new(
        worker_id: impl Into<String>,
        shift_type_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        polarity: RequestPolarity,
        priority: u32,
    ) -> Self {
        WorkerRequest {
            worker_id: worker_id.into(),
            shift_type_id: shift_type_id.into(),
            start,
            end,
            polarity,
            priority,
        }
    }
}
