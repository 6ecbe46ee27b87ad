use chrono::NaiveDateTime;
use tracing::debug;

use crate::models::chart::{ChartData, DeltaPoint, FirstDeltaPolicy, SeriesPoint};
use crate::models::grouping::GroupingMode;
use crate::models::observation::Observation;
use crate::services::grouping_service::GroupingService;

/// Generates chart-ready data sets from a snapshot of observations.
///
/// The core computes all the numbers — the frontend only renders.
/// Chart data includes:
/// - The grouped value series for the selected mode
/// - The period-over-period delta series
/// - The series maximum (for deviation-from-max labels)
pub struct ChartService {
    grouping_service: GroupingService,
    first_delta_policy: FirstDeltaPolicy,
}

impl ChartService {
    pub fn new() -> Self {
        Self::with_options(GroupingService::new(), FirstDeltaPolicy::Drop)
    }

    pub fn with_options(grouping_service: GroupingService, first_delta_policy: FirstDeltaPolicy) -> Self {
        Self {
            grouping_service,
            first_delta_policy,
        }
    }

    #[must_use]
    pub fn first_delta_policy(&self) -> FirstDeltaPolicy {
        self.first_delta_policy
    }

    /// Delta series for an ascending grouped series, using this service's policy.
    pub fn diff(&self, series: &[SeriesPoint]) -> Vec<DeltaPoint> {
        diff_with_policy(series, self.first_delta_policy)
    }

    /// Group `observations` and derive the delta series and the series maximum.
    pub fn generate_chart(
        &self,
        observations: &[Observation],
        mode: GroupingMode,
        now: NaiveDateTime,
    ) -> ChartData {
        let series = self.grouping_service.group(observations, mode, now);
        let deltas = self.diff(&series);
        let max_value = series_max(&series);

        debug!(%mode, points = series.len(), deltas = deltas.len(), "chart generated");

        ChartData {
            mode,
            series,
            deltas,
            max_value,
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed change of each bucket relative to its predecessor.
///
/// Under [`FirstDeltaPolicy::Drop`] the result has `len - 1` entries (none for
/// an empty or single-bucket series). Under [`FirstDeltaPolicy::ZeroSentinel`]
/// the first bucket contributes a `0.0` entry and the lengths match.
pub fn diff_with_policy(series: &[SeriesPoint], policy: FirstDeltaPolicy) -> Vec<DeltaPoint> {
    let mut deltas = Vec::with_capacity(series.len());

    if policy == FirstDeltaPolicy::ZeroSentinel {
        if let Some(first) = series.first() {
            deltas.push(DeltaPoint::new(first.date, 0.0));
        }
    }

    deltas.extend(
        series
            .windows(2)
            .map(|pair| DeltaPoint::new(pair[1].date, pair[1].value - pair[0].value)),
    );
    deltas
}

/// Highest value in the series, `None` when it is empty.
pub fn series_max(series: &[SeriesPoint]) -> Option<f64> {
    series.iter().map(|p| p.value).reduce(f64::max)
}

/// `point.value - max(series)`. `None` for an empty series.
pub fn deviation_from_max(point: &SeriesPoint, series: &[SeriesPoint]) -> Option<f64> {
    series_max(series).map(|max| point.value - max)
}
