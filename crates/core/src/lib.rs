pub mod errors;
pub mod models;
pub mod services;

use chrono::{Local, NaiveDate, NaiveDateTime};
use models::{
    chart::{ChartData, DeltaPoint, FirstDeltaPolicy, SeriesPoint, SeriesRow},
    grouping::GroupingMode,
    ledger::Ledger,
    observation::{Observation, ObservationSortOrder, UpsertOutcome},
    settings::Settings,
};
use services::{
    analytics_service::AnalyticsService,
    chart_service::{self, ChartService},
    grouping_service::GroupingService,
    ledger_service::LedgerService,
};

use errors::CoreError;

/// Main entry point for the Asset Tracker core library.
/// Holds the ledger, the currently selected grouping mode, and the services
/// that operate on them.
#[must_use]
pub struct AssetTracker {
    ledger: Ledger,
    grouping: GroupingMode,
    ledger_service: LedgerService,
    grouping_service: GroupingService,
    chart_service: ChartService,
    analytics_service: AnalyticsService,
}

impl std::fmt::Debug for AssetTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetTracker")
            .field("observations", &self.ledger.observations.len())
            .field("settings", &self.ledger.settings)
            .field("grouping", &self.grouping)
            .finish()
    }
}

impl AssetTracker {
    /// Create a brand new empty tracker with default settings.
    pub fn create_new() -> Self {
        Self::build(Ledger::default())
    }

    /// Wrap an existing ledger, e.g. one handed over by the storage layer.
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self::build(ledger)
    }

    /// Restore a tracker from the JSON produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let ledger: Ledger = serde_json::from_str(json)?;
        Self::validate_settings(&ledger.settings)?;
        Ok(Self::build(ledger))
    }

    /// Serialize the whole ledger (observations + settings) as JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    /// Borrow the underlying ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ── Observation Management ──────────────────────────────────────

    /// Record `amount` for the calendar day of `timestamp`.
    /// Replaces the amount of an existing observation on that day instead of
    /// adding a second one.
    pub fn upsert_observation(
        &mut self,
        timestamp: NaiveDateTime,
        amount: f64,
    ) -> Result<UpsertOutcome, CoreError> {
        self.ledger_service
            .upsert(&mut self.ledger, Observation::new(timestamp, amount))
    }

    /// Record `amount` for a calendar date, stamped at midnight.
    pub fn upsert_observation_on(
        &mut self,
        date: NaiveDate,
        amount: f64,
    ) -> Result<UpsertOutcome, CoreError> {
        self.upsert_observation(date.and_time(chrono::NaiveTime::MIN), amount)
    }

    /// Remove an observation by its ID and return it.
    pub fn remove_observation(&mut self, observation_id: uuid::Uuid) -> Result<Observation, CoreError> {
        self.ledger_service
            .remove_observation(&mut self.ledger, observation_id)
    }

    /// Remove multiple observations at once. If any ID is unknown,
    /// none are removed (all-or-nothing).
    pub fn remove_observations(&mut self, observation_ids: &[uuid::Uuid]) -> Result<(), CoreError> {
        let mut temp_ledger = self.ledger.clone();

        for id in observation_ids {
            self.ledger_service.remove_observation(&mut temp_ledger, *id)?;
        }

        self.ledger = temp_ledger;
        Ok(())
    }

    /// Get a single observation by its ID.
    #[must_use]
    pub fn get_observation(&self, observation_id: uuid::Uuid) -> Option<&Observation> {
        self.ledger.observations.iter().find(|o| o.id == observation_id)
    }

    /// Get the observation recorded on the same calendar day as `timestamp`, if any.
    #[must_use]
    pub fn get_observation_on(&self, timestamp: NaiveDateTime) -> Option<&Observation> {
        self.ledger_service.find_same_day(&self.ledger, timestamp)
    }

    /// Get all observations, newest first.
    #[must_use]
    pub fn get_observations(&self) -> Vec<&Observation> {
        self.ledger_service.get_observations(&self.ledger)
    }

    /// Get observations sorted by a specific order.
    #[must_use]
    pub fn get_observations_sorted(&self, order: ObservationSortOrder) -> Vec<&Observation> {
        self.ledger_service
            .get_observations_sorted(&self.ledger, order)
    }

    /// Get observations within a date range (inclusive, by calendar day).
    /// Returns newest-first, consistent with `get_observations()`.
    #[must_use]
    pub fn get_observations_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Observation> {
        self.ledger_service
            .get_observations_in_range(&self.ledger, from, to)
    }

    /// Read-only snapshot of all observations in store order, for aggregation.
    #[must_use]
    pub fn snapshot(&self) -> &[Observation] {
        &self.ledger.observations
    }

    /// Get the total number of observations.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.ledger.observations.len()
    }

    /// Calendar day of the earliest observation.
    #[must_use]
    pub fn earliest_observation_date(&self) -> Option<NaiveDate> {
        self.ledger.observations.iter().map(Observation::day).min()
    }

    /// Calendar day of the most recent observation.
    #[must_use]
    pub fn latest_observation_date(&self) -> Option<NaiveDate> {
        self.ledger.observations.iter().map(Observation::day).max()
    }

    // ── Grouping Mode ───────────────────────────────────────────────

    /// Currently selected grouping mode.
    #[must_use]
    pub fn grouping(&self) -> GroupingMode {
        self.grouping
    }

    pub fn set_grouping(&mut self, mode: GroupingMode) {
        self.grouping = mode;
    }

    /// Move to the next coarser mode (clamped at `Yearly`). Returns the new mode.
    pub fn next_grouping(&mut self) -> GroupingMode {
        self.grouping = self.grouping.successor();
        self.grouping
    }

    /// Move to the next finer mode (clamped at `Daily`). Returns the new mode.
    pub fn previous_grouping(&mut self) -> GroupingMode {
        self.grouping = self.grouping.predecessor();
        self.grouping
    }

    // ── Series & Charts ─────────────────────────────────────────────

    /// Grouped series for `mode`, relative to the local clock.
    #[must_use]
    pub fn group(&self, mode: GroupingMode) -> Vec<SeriesPoint> {
        self.group_at(mode, Self::now())
    }

    /// Grouped series for `mode`, relative to `now`.
    #[must_use]
    pub fn group_at(&self, mode: GroupingMode, now: NaiveDateTime) -> Vec<SeriesPoint> {
        self.grouping_service
            .group(&self.ledger.observations, mode, now)
    }

    /// Delta series for a grouped series, using the configured first-point policy.
    #[must_use]
    pub fn diff(&self, series: &[SeriesPoint]) -> Vec<DeltaPoint> {
        self.chart_service.diff(series)
    }

    /// `point.value - max(series)`. `None` for an empty series.
    #[must_use]
    pub fn deviation_from_max(&self, point: &SeriesPoint, series: &[SeriesPoint]) -> Option<f64> {
        chart_service::deviation_from_max(point, series)
    }

    /// Chart data for the currently selected grouping mode.
    #[must_use]
    pub fn chart(&self) -> ChartData {
        self.chart_at(self.grouping, Self::now())
    }

    /// Chart data for `mode`, relative to `now`.
    #[must_use]
    pub fn chart_at(&self, mode: GroupingMode, now: NaiveDateTime) -> ChartData {
        self.chart_service
            .generate_chart(&self.ledger.observations, mode, now)
    }

    /// Most recent buckets of the currently selected mode, newest first.
    #[must_use]
    pub fn recent_rows(&self) -> Vec<SeriesRow> {
        self.recent_rows_at(self.grouping, Self::now())
    }

    /// Most recent buckets of `mode` relative to `now`, newest first,
    /// limited to `Settings::recent_rows_limit`.
    #[must_use]
    pub fn recent_rows_at(&self, mode: GroupingMode, now: NaiveDateTime) -> Vec<SeriesRow> {
        let series = self.group_at(mode, now);
        self.analytics_service
            .recent_rows(&series, self.ledger.settings.recent_rows_limit)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    /// Set the mode a freshly loaded tracker starts in.
    pub fn set_default_grouping(&mut self, mode: GroupingMode) {
        self.ledger.settings.default_grouping = mode;
    }

    /// Choose whether delta series carry a zero entry for the first bucket.
    pub fn set_first_delta_policy(&mut self, policy: FirstDeltaPolicy) {
        self.ledger.settings.first_delta_policy = policy;
        self.rebuild_services();
    }

    /// Set the trailing window of the `Daily` grouping. Must be at least one day.
    pub fn set_daily_window_days(&mut self, days: i64) -> Result<(), CoreError> {
        if days < 1 {
            return Err(CoreError::ValidationError(format!(
                "Daily window must be at least 1 day, got {days}"
            )));
        }
        self.ledger.settings.daily_window_days = days;
        self.rebuild_services();
        Ok(())
    }

    /// Set how many rows `recent_rows` returns. Must be at least one.
    pub fn set_recent_rows_limit(&mut self, limit: usize) -> Result<(), CoreError> {
        if limit == 0 {
            return Err(CoreError::ValidationError(
                "Recent rows limit must be at least 1".into(),
            ));
        }
        self.ledger.settings.recent_rows_limit = limit;
        Ok(())
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all observations as a JSON string.
    pub fn export_observations_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger.observations)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize observations to JSON: {e}")))
    }

    /// Import observations from a JSON string. Each record goes through
    /// upsert-by-day; if any record is invalid, nothing is imported.
    /// Returns the number of records processed.
    pub fn import_observations_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let observations: Vec<Observation> = serde_json::from_str(json)?;
        let count = observations.len();

        let mut temp_ledger = self.ledger.clone();
        for observation in observations {
            self.ledger_service.upsert(&mut temp_ledger, observation)?;
        }

        self.ledger = temp_ledger;
        Ok(count)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn validate_settings(settings: &Settings) -> Result<(), CoreError> {
        if settings.daily_window_days < 1 {
            return Err(CoreError::ValidationError(format!(
                "Daily window must be at least 1 day, got {}",
                settings.daily_window_days
            )));
        }
        if settings.recent_rows_limit == 0 {
            return Err(CoreError::ValidationError(
                "Recent rows limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn rebuild_services(&mut self) {
        let settings = &self.ledger.settings;
        self.grouping_service = GroupingService::with_daily_window(settings.daily_window_days);
        self.chart_service = ChartService::with_options(
            GroupingService::with_daily_window(settings.daily_window_days),
            settings.first_delta_policy,
        );
        self.analytics_service = AnalyticsService::with_policy(settings.first_delta_policy);
    }

    fn build(ledger: Ledger) -> Self {
        let grouping = ledger.settings.default_grouping;
        let mut tracker = Self {
            ledger,
            grouping,
            ledger_service: LedgerService::new(),
            grouping_service: GroupingService::new(),
            chart_service: ChartService::new(),
            analytics_service: AnalyticsService::new(),
        };
        tracker.rebuild_services();
        tracker
    }
}
