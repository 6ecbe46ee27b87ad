use serde::{Deserialize, Serialize};

use super::observation::Observation;
use super::settings::Settings;

/// The main data container: the recorded observations and user settings.
///
/// Observations are kept sorted by timestamp (oldest first); that order is
/// the "store order" used when resolving same-day lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// All recorded observations
    pub observations: Vec<Observation>,

    /// User settings (grouping, delta policy, windows)
    #[serde(default)]
    pub settings: Settings,
}
