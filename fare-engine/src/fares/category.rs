//! Rider fare categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The rider category a set of fare rules prices for.
///
/// Each category has its own rule list and is computed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FareCategory {
    Regular,
    Student,
    Senior,
    Youth,
    Tram,
    Special,
}

impl FareCategory {
    /// All categories, in result order.
    pub const ALL: [FareCategory; 6] = [
        FareCategory::Regular,
        FareCategory::Student,
        FareCategory::Senior,
        FareCategory::Youth,
        FareCategory::Tram,
        FareCategory::Special,
    ];

    /// Machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FareCategory::Regular => "regular",
            FareCategory::Student => "student",
            FareCategory::Senior => "senior",
            FareCategory::Youth => "youth",
            FareCategory::Tram => "tram",
            FareCategory::Special => "special",
        }
    }
}

impl fmt::Display for FareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
