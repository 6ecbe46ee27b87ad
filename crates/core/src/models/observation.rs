use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sort order for observation listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationSortOrder {
    /// Newest timestamp first (default for display)
    DateDesc,
    /// Oldest timestamp first
    DateAsc,
    /// Largest amount first
    AmountDesc,
    /// Smallest amount first
    AmountAsc,
}

/// A single recorded net-worth value.
///
/// The timestamp is a local wall-clock reading: day, month and year
/// boundaries are those of the user's calendar, so no timezone is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique identifier
    pub id: Uuid,

    /// When the value was recorded (local calendar date + time of day)
    pub timestamp: NaiveDateTime,

    /// Recorded value in the smallest currency unit (e.g. won). May be negative.
    pub amount: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            amount,
        }
    }

    /// Calendar day this observation belongs to.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Day-granularity equality: `true` if both readings fall on the same calendar day.
    #[must_use]
    pub fn is_same_day(&self, timestamp: NaiveDateTime) -> bool {
        self.day() == timestamp.date()
    }
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No observation existed on that day; a new one was created.
    Inserted(Uuid),
    /// An observation on that day already existed and its amount was replaced.
    Updated(Uuid),
}

impl UpsertOutcome {
    /// Id of the record that was inserted or updated.
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Updated(id) => *id,
        }
    }
}
