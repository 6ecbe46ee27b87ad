use crate::models::chart::{FirstDeltaPolicy, SeriesPoint, SeriesRow};
use crate::services::chart_service::series_max;

/// Computes per-bucket table rows: value, change from the previous bucket,
/// and distance below the series maximum.
pub struct AnalyticsService {
    first_delta_policy: FirstDeltaPolicy,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self::with_policy(FirstDeltaPolicy::Drop)
    }

    pub fn with_policy(first_delta_policy: FirstDeltaPolicy) -> Self {
        Self { first_delta_policy }
    }

    /// Rows for every bucket of an ascending grouped series, newest first,
    /// truncated to `limit` rows.
    pub fn recent_rows(&self, series: &[SeriesPoint], limit: usize) -> Vec<SeriesRow> {
        let Some(max) = series_max(series) else {
            return Vec::new();
        };

        let first_delta = match self.first_delta_policy {
            FirstDeltaPolicy::Drop => None,
            FirstDeltaPolicy::ZeroSentinel => Some(0.0),
        };

        series
            .iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(i, point)| SeriesRow {
                date: point.date,
                value: point.value,
                delta: match i {
                    0 => first_delta,
                    _ => Some(point.value - series[i - 1].value),
                },
                deviation_from_max: point.value - max,
            })
            .collect()
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
