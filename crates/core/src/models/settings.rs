use serde::{Deserialize, Serialize};

use super::chart::FirstDeltaPolicy;
use super::grouping::GroupingMode;

/// Default trailing window for the `Daily` grouping, in days.
pub const DEFAULT_DAILY_WINDOW_DAYS: i64 = 365;

/// Default number of rows in the recent-buckets table.
pub const DEFAULT_RECENT_ROWS_LIMIT: usize = 13;

/// User-configurable settings, stored inside the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Grouping mode the tracker starts in.
    #[serde(default)]
    pub default_grouping: GroupingMode,

    /// Whether delta series start with a zero entry or skip the first bucket.
    #[serde(default)]
    pub first_delta_policy: FirstDeltaPolicy,

    /// Only observations this many days before "now" or later are bucketed in `Daily` mode.
    #[serde(default = "default_daily_window_days")]
    pub daily_window_days: i64,

    /// Maximum number of rows returned by the recent-buckets table.
    #[serde(default = "default_recent_rows_limit")]
    pub recent_rows_limit: usize,
}

fn default_daily_window_days() -> i64 {
    DEFAULT_DAILY_WINDOW_DAYS
}

fn default_recent_rows_limit() -> usize {
    DEFAULT_RECENT_ROWS_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_grouping: GroupingMode::Daily,
            first_delta_policy: FirstDeltaPolicy::Drop,
            daily_window_days: DEFAULT_DAILY_WINDOW_DAYS,
            recent_rows_limit: DEFAULT_RECENT_ROWS_LIMIT,
        }
    }
}
