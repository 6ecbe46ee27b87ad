use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Time granularity used to bucket observations.
///
/// Ordered `Daily < Monthly < Yearly`; navigation with [`successor`](Self::successor)
/// and [`predecessor`](Self::predecessor) is clamped at both ends.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum GroupingMode {
    /// One bucket per calendar day, trailing window only
    #[default]
    Daily,
    /// One bucket per (year, month), full history
    Monthly,
    /// One bucket per year, full history
    Yearly,
}

impl GroupingMode {
    /// All modes in navigation order.
    pub const ALL: [GroupingMode; 3] = [GroupingMode::Daily, GroupingMode::Monthly, GroupingMode::Yearly];

    /// The next coarser mode, or `self` when already at `Yearly`.
    #[must_use]
    pub fn successor(self) -> Self {
        match self {
            GroupingMode::Daily => GroupingMode::Monthly,
            GroupingMode::Monthly | GroupingMode::Yearly => GroupingMode::Yearly,
        }
    }

    /// The next finer mode, or `self` when already at `Daily`.
    #[must_use]
    pub fn predecessor(self) -> Self {
        match self {
            GroupingMode::Yearly => GroupingMode::Monthly,
            GroupingMode::Monthly | GroupingMode::Daily => GroupingMode::Daily,
        }
    }

    /// Bucket a timestamp falls into under this mode.
    #[must_use]
    pub fn bucket_key(self, timestamp: NaiveDateTime) -> BucketKey {
        let day = timestamp.date();
        match self {
            GroupingMode::Daily => BucketKey::Day(day),
            GroupingMode::Monthly => BucketKey::Month(day.with_day(1).unwrap_or(day)),
            GroupingMode::Yearly => BucketKey::Year(day.with_ordinal(1).unwrap_or(day)),
        }
    }
}

impl std::fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingMode::Daily => write!(f, "Daily"),
            GroupingMode::Monthly => write!(f, "Monthly"),
            GroupingMode::Yearly => write!(f, "Annually"),
        }
    }
}

impl FromStr for GroupingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(GroupingMode::Daily),
            "monthly" | "month" => Ok(GroupingMode::Monthly),
            "yearly" | "annually" | "year" => Ok(GroupingMode::Yearly),
            _ => Err(CoreError::UnknownGrouping(s.to_string())),
        }
    }
}

/// Identity of a bucket. Each variant wraps the bucket's normalized start
/// date (the day itself, the 1st of the month, or January 1st), which is
/// also the representative date reported for the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    Day(NaiveDate),
    Month(NaiveDate),
    Year(NaiveDate),
}

impl BucketKey {
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        match self {
            BucketKey::Day(d) | BucketKey::Month(d) | BucketKey::Year(d) => *d,
        }
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketKey::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            BucketKey::Month(d) => write!(f, "{}", d.format("%Y-%m")),
            BucketKey::Year(d) => write!(f, "{}", d.format("%Y")),
        }
    }
}
