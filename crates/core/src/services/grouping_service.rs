use chrono::{Duration, NaiveDateTime};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::chart::SeriesPoint;
use crate::models::grouping::{BucketKey, GroupingMode};
use crate::models::observation::Observation;
use crate::models::settings::DEFAULT_DAILY_WINDOW_DAYS;

/// Buckets a snapshot of observations into a daily, monthly or yearly series.
///
/// Every call works on the slice it is given and returns a fresh series;
/// nothing is cached between calls.
pub struct GroupingService {
    daily_window_days: i64,
}

impl GroupingService {
    pub fn new() -> Self {
        Self::with_daily_window(DEFAULT_DAILY_WINDOW_DAYS)
    }

    /// Use a custom trailing window (in days) for `Daily` grouping.
    pub fn with_daily_window(daily_window_days: i64) -> Self {
        Self { daily_window_days }
    }

    #[must_use]
    pub fn daily_window_days(&self) -> i64 {
        self.daily_window_days
    }

    /// Group `observations` by `mode`, relative to `now`.
    ///
    /// - `Daily` keeps only observations at or after `now - daily_window_days`.
    /// - Each bucket is represented by its latest observation; on equal
    ///   timestamps the one appearing first in `observations` wins.
    /// - The result is sorted by bucket start date, strictly ascending, with
    ///   empty buckets omitted.
    pub fn group(
        &self,
        observations: &[Observation],
        mode: GroupingMode,
        now: NaiveDateTime,
    ) -> Vec<SeriesPoint> {
        // a window reaching past the representable range keeps everything
        let window_start = Duration::try_days(self.daily_window_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(NaiveDateTime::MIN);

        let mut latest: BTreeMap<BucketKey, &Observation> = BTreeMap::new();
        for observation in observations {
            debug_assert!(
                observation.amount.is_finite(),
                "non-finite amount in observation {}",
                observation.id
            );
            if mode == GroupingMode::Daily && observation.timestamp < window_start {
                continue;
            }

            match latest.entry(mode.bucket_key(observation.timestamp)) {
                Entry::Vacant(slot) => {
                    slot.insert(observation);
                }
                Entry::Occupied(mut slot) => {
                    // strictly later only: ties keep the earlier input
                    if observation.timestamp > slot.get().timestamp {
                        slot.insert(observation);
                    }
                }
            }
        }

        let series: Vec<SeriesPoint> = latest
            .into_iter()
            .map(|(key, observation)| SeriesPoint::new(key.start_date(), observation.amount))
            .collect();

        debug!(
            %mode,
            observations = observations.len(),
            buckets = series.len(),
            "grouped observations"
        );
        series
    }
}

impl Default for GroupingService {
    fn default() -> Self {
        Self::new()
    }
}
