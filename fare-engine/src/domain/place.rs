//! Stops and the fare zones they belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::FeedScopedId;

/// A fare zone: the unit of fare geography, scoped to a feed.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::{FareZone, FeedScopedId};
///
/// let a = FareZone::parse("HSL:A").unwrap();
/// assert_eq!(a.id(), &FeedScopedId::parse("HSL:A").unwrap());
/// assert_eq!(a.to_string(), "HSL:A");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FareZone(FeedScopedId);

impl FareZone {
    /// Create a zone from its id.
    pub fn new(id: FeedScopedId) -> Self {
        Self(id)
    }

    /// Parse a zone from the `feed:id` form.
    pub fn parse(s: &str) -> Result<Self, super::InvalidFeedScopedId> {
        FeedScopedId::parse(s).map(Self)
    }

    /// Returns the zone id.
    pub fn id(&self) -> &FeedScopedId {
        &self.0
    }
}

impl From<FeedScopedId> for FareZone {
    fn from(id: FeedScopedId) -> Self {
        Self(id)
    }
}

impl fmt::Debug for FareZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FareZone({})", self.0)
    }
}

impl fmt::Display for FareZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A stop or other location where a leg begins or ends.
///
/// A stop may sit in several fare zones (border stops), or in none at all
/// when it lies outside the fare network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    /// Display name
    pub name: String,
    /// Fare zones this place belongs to
    pub zones: Vec<FareZone>,
}

impl Place {
    /// Create a place outside any fare zone.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zones: Vec::new(),
        }
    }

    /// Create a place inside a single fare zone.
    pub fn in_zone(name: impl Into<String>, zone: FareZone) -> Self {
        Self {
            name: name.into(),
            zones: vec![zone],
        }
    }

    /// Add another fare zone to this place.
    pub fn with_zone(mut self, zone: FareZone) -> Self {
        if !self.zones.contains(&zone) {
            self.zones.push(zone);
        }
        self
    }

    /// Returns the fare zones of this place.
    pub fn zones(&self) -> &[FareZone] {
        &self.zones
    }

    /// Returns true if the place is outside every fare zone.
    pub fn is_outside_fare_network(&self) -> bool {
        self.zones.is_empty()
    }
}
