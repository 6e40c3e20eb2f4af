//! Configuration for fare computation.

use serde::{Deserialize, Serialize};

/// Which stops of a transit leg count towards its zone-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneAccounting {
    /// Zones of the boarding and alighting stops.
    #[default]
    BoardAlight,
    /// Zones of every stop the vehicle calls at, intermediate ones included.
    AllStops,
}

/// Configuration parameters for fare computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareConfig {
    /// How a leg's zone-set is derived.
    pub zone_accounting: ZoneAccounting,

    /// Whether a group no rule matches may keep collecting following legs
    /// (within the category's accumulation window) until a rule covers them
    /// together. When off, every unmatched group is closed at the next leg.
    pub accumulate_unmatched: bool,
}

impl FareConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(zone_accounting: ZoneAccounting, accumulate_unmatched: bool) -> Self {
        Self {
            zone_accounting,
            accumulate_unmatched,
        }
    }
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            zone_accounting: ZoneAccounting::BoardAlight,
            accumulate_unmatched: true,
        }
    }
}
