use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::observation::{Observation, ObservationSortOrder, UpsertOutcome};

/// Manages recorded observations and enforces one observation per calendar day.
///
/// Pure business logic — no I/O. Easy to test.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Record `observation` under upsert-by-day semantics.
    ///
    /// If an observation already exists on the same calendar day, its amount
    /// is replaced and its original id and timestamp are kept. Otherwise
    /// `observation` is inserted as given. When several observations share
    /// the day (a ledger built outside this service), only the one grouping
    /// represents the day by is updated: the latest timestamp, first in store
    /// order on ties.
    ///
    /// Rejects non-finite amounts, and inserting an id that is already
    /// present on another day.
    pub fn upsert(
        &self,
        ledger: &mut Ledger,
        observation: Observation,
    ) -> Result<UpsertOutcome, CoreError> {
        Self::validate_amount(observation.amount)?;
        let day = observation.day();

        let same_day = ledger.observations.iter().filter(|o| o.day() == day).count();
        if same_day > 1 {
            warn!(
                %day,
                duplicates = same_day,
                "multiple observations share one day; updating the latest"
            );
        }

        let target = ledger
            .observations
            .iter_mut()
            .filter(|o| o.day() == day)
            .reduce(|best, o| if o.timestamp > best.timestamp { o } else { best });

        if let Some(existing) = target {
            existing.amount = observation.amount;
            info!(id = %existing.id, %day, amount = existing.amount, "observation updated");
            return Ok(UpsertOutcome::Updated(existing.id));
        }

        let id = observation.id;
        if ledger.observations.iter().any(|o| o.id == id) {
            return Err(CoreError::ValidationError(format!(
                "Observation {id} already exists on a different day"
            )));
        }
        let amount = observation.amount;
        Self::sorted_insert(&mut ledger.observations, observation);
        info!(%id, %day, amount, "observation inserted");
        Ok(UpsertOutcome::Inserted(id))
    }

    /// Remove an observation by its UUID and return it.
    pub fn remove_observation(
        &self,
        ledger: &mut Ledger,
        observation_id: Uuid,
    ) -> Result<Observation, CoreError> {
        let idx = ledger
            .observations
            .iter()
            .position(|o| o.id == observation_id)
            .ok_or_else(|| CoreError::ObservationNotFound(observation_id.to_string()))?;

        let removed = ledger.observations.remove(idx);
        info!(id = %removed.id, day = %removed.day(), "observation removed");
        Ok(removed)
    }

    /// The observation representing the calendar day of `timestamp`: the
    /// latest one that day, first in store order on ties.
    pub fn find_same_day<'a>(
        &self,
        ledger: &'a Ledger,
        timestamp: NaiveDateTime,
    ) -> Option<&'a Observation> {
        ledger
            .observations
            .iter()
            .filter(|o| o.is_same_day(timestamp))
            .reduce(|best, o| if o.timestamp > best.timestamp { o } else { best })
    }

    /// Get all observations sorted by timestamp (newest first for display).
    pub fn get_observations<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Observation> {
        let mut observations: Vec<&Observation> = ledger.observations.iter().collect();
        observations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        observations
    }

    /// All observations in the requested order.
    pub fn get_observations_sorted<'a>(
        &self,
        ledger: &'a Ledger,
        order: ObservationSortOrder,
    ) -> Vec<&'a Observation> {
        let mut observations: Vec<&Observation> = ledger.observations.iter().collect();
        match order {
            ObservationSortOrder::DateDesc => observations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            ObservationSortOrder::DateAsc => observations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            ObservationSortOrder::AmountDesc => observations.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
            ObservationSortOrder::AmountAsc => observations.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        }
        observations
    }

    /// Observations whose calendar day lies within `from..=to`, newest first.
    pub fn get_observations_in_range<'a>(
        &self,
        ledger: &'a Ledger,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<&'a Observation> {
        let mut observations: Vec<&Observation> = ledger
            .observations
            .iter()
            .filter(|o| o.day() >= from && o.day() <= to)
            .collect();
        observations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        observations
    }

    /// Amounts must be finite; NaN or infinity would poison every derived series.
    fn validate_amount(amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Observation amount must be a finite number, got {amount}"
            )));
        }
        Ok(())
    }

    /// Insert into a timestamp-sorted Vec<Observation>, after any equal timestamps.
    fn sorted_insert(observations: &mut Vec<Observation>, observation: Observation) {
        let pos = observations.partition_point(|o| o.timestamp <= observation.timestamp);
        observations.insert(pos, observation);
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
