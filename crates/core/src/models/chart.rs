use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::grouping::GroupingMode;

/// One bucket of a grouped series.
///
/// The core generates these — the frontend just renders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Representative date of the bucket (day, 1st of month, or January 1st)
    pub date: NaiveDate,

    /// Amount of the latest observation inside the bucket
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Change of a bucket's value relative to the preceding bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaPoint {
    /// Date of the later of the two buckets
    pub date: NaiveDate,

    /// `value(bucket[i]) - value(bucket[i - 1])`
    pub delta: f64,
}

impl DeltaPoint {
    pub fn new(date: NaiveDate, delta: f64) -> Self {
        Self { date, delta }
    }
}

/// How the first bucket is represented in a delta series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstDeltaPolicy {
    /// The first bucket has no predecessor and produces no delta entry.
    #[default]
    Drop,
    /// The first bucket produces an explicit `0.0` entry, so the delta
    /// series has the same length as the grouped series.
    ZeroSentinel,
}

/// Everything needed to draw the value chart and the delta chart for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub mode: GroupingMode,

    /// Grouped series, ascending by date
    pub series: Vec<SeriesPoint>,

    /// Period-over-period changes, ascending by date
    pub deltas: Vec<DeltaPoint>,

    /// Highest bucket value, `None` for an empty series
    pub max_value: Option<f64>,
}

/// A row of the recent-buckets table shown under the charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub date: NaiveDate,

    pub value: f64,

    /// Change from the previous bucket. `None` for the earliest bucket unless
    /// the zero sentinel policy is active.
    pub delta: Option<f64>,

    /// `value - max(series)`; always <= 0
    pub deviation_from_max: f64,
}
