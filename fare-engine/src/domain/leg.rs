//! Itinerary leg types.
//!
//! A `Segment` is either a transit ride (`TransitLeg`) or a street leg
//! (walking, cycling, car-hail...). Only transit legs are priced; street
//! legs are kept so timing continuity across them stays visible.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{AgencyId, DomainError, Place, RouteId};

/// Position of a segment within its itinerary.
///
/// Fare components refer to the legs they cover by index rather than by
/// value, so a component is meaningful only next to its itinerary.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::LegIndex;
///
/// let idx = LegIndex(0);
/// assert_eq!(idx.next(), LegIndex(1));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LegIndex(pub usize);

impl LegIndex {
    /// Returns the next index.
    pub fn next(self) -> Self {
        LegIndex(self.0 + 1)
    }
}

impl fmt::Display for LegIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vehicle type of a transit leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Bus,
    Tram,
    Subway,
    Rail,
    Ferry,
    Coach,
}

/// Mode of a non-transit leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetMode {
    Walk,
    Bicycle,
    Scooter,
    Car,
    CarHail,
}

/// A ride on a transit vehicle from boarding to alighting.
///
/// # Invariants
///
/// - `end >= start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitLeg {
    mode: TransitMode,
    from: Place,
    to: Place,
    intermediate_stops: Vec<Place>,
    agency: AgencyId,
    route: RouteId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TransitLeg {
    /// Construct a transit leg, validating its time span.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `end` is before `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_engine::domain::{FareZone, FeedScopedId, Place, TransitLeg, TransitMode};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let a = FareZone::parse("HSL:A").unwrap();
    /// let leg = TransitLeg::new(
    ///     TransitMode::Bus,
    ///     Place::in_zone("A1", a.clone()),
    ///     Place::in_zone("A2", a),
    ///     FeedScopedId::parse("HSL:AG1").unwrap(),
    ///     FeedScopedId::parse("HSL:R1").unwrap(),
    ///     Utc.with_ymd_and_hms(2024, 3, 15, 11, 6, 0).unwrap(),
    ///     Utc.with_ymd_and_hms(2024, 3, 15, 11, 12, 0).unwrap(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(leg.feed(), "HSL");
    /// assert_eq!(leg.duration(), chrono::Duration::minutes(6));
    /// ```
    pub fn new(
        mode: TransitMode,
        from: Place,
        to: Place,
        agency: AgencyId,
        route: RouteId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidLeg("end must not be before start"));
        }

        Ok(TransitLeg {
            mode,
            from,
            to,
            intermediate_stops: Vec::new(),
            agency,
            route,
            start,
            end,
        })
    }

    /// Attach the stops passed between boarding and alighting.
    pub fn with_intermediate_stops(mut self, stops: Vec<Place>) -> Self {
        self.intermediate_stops = stops;
        self
    }

    /// Returns the vehicle type.
    pub fn mode(&self) -> TransitMode {
        self.mode
    }

    /// Returns the boarding place.
    pub fn from(&self) -> &Place {
        &self.from
    }

    /// Returns the alighting place.
    pub fn to(&self) -> &Place {
        &self.to
    }

    /// Returns the stops passed between boarding and alighting, if known.
    pub fn intermediate_stops(&self) -> &[Place] {
        &self.intermediate_stops
    }

    /// Returns the operating agency.
    pub fn agency(&self) -> &AgencyId {
        &self.agency
    }

    /// Returns the route.
    pub fn route(&self) -> &RouteId {
        &self.route
    }

    /// Returns the feed the leg's operator belongs to.
    pub fn feed(&self) -> &str {
        self.agency.feed()
    }

    /// Returns the boarding instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the alighting instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the ride duration.
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }
}

/// A non-transit leg: walking, cycling, a car-hail ride...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetLeg {
    mode: StreetMode,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl StreetLeg {
    /// Construct a street leg, validating its time span.
    pub fn new(
        mode: StreetMode,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidLeg("end must not be before start"));
        }
        Ok(StreetLeg { mode, start, end })
    }

    /// Returns the street mode.
    pub fn mode(&self) -> StreetMode {
        self.mode
    }

    /// Returns the start instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the end instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// A segment of an itinerary: either a transit ride or a street leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A ride on a transit vehicle
    Transit(TransitLeg),
    /// Walking, cycling, driving...
    Street(StreetLeg),
}

impl Segment {
    /// Returns the start instant of this segment.
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            Segment::Transit(leg) => leg.start(),
            Segment::Street(leg) => leg.start(),
        }
    }

    /// Returns the end instant of this segment.
    pub fn end(&self) -> DateTime<Utc> {
        match self {
            Segment::Transit(leg) => leg.end(),
            Segment::Street(leg) => leg.end(),
        }
    }

    /// Returns true if this is a transit segment.
    pub fn is_transit(&self) -> bool {
        matches!(self, Segment::Transit(_))
    }

    /// Returns the transit leg if this is a transit segment.
    pub fn as_transit(&self) -> Option<&TransitLeg> {
        match self {
            Segment::Transit(leg) => Some(leg),
            Segment::Street(_) => None,
        }
    }
}

impl From<TransitLeg> for Segment {
    fn from(leg: TransitLeg) -> Self {
        Segment::Transit(leg)
    }
}

impl From<StreetLeg> for Segment {
    fn from(leg: StreetLeg) -> Self {
        Segment::Street(leg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FareZone, FeedScopedId};
    use chrono::{NaiveDate, NaiveTime};

    fn time(s: &str) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let time = NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        date.and_time(time).and_utc()
    }

    fn id(s: &str) -> FeedScopedId {
        FeedScopedId::parse(s).unwrap()
    }

    fn bus(start: &str, end: &str) -> Result<TransitLeg, DomainError> {
        let a = FareZone::parse("F:A").unwrap();
        TransitLeg::new(
            TransitMode::Bus,
            Place::in_zone("A1", a.clone()),
            Place::in_zone("A2", a),
            id("F:AG1"),
            id("F:R1"),
            time(start),
            time(end),
        )
    }

    #[test]
    fn transit_leg_valid() {
        let leg = bus("11:06", "11:12").unwrap();
        assert_eq!(leg.start(), time("11:06"));
        assert_eq!(leg.end(), time("11:12"));
        assert_eq!(leg.duration(), Duration::minutes(6));
        assert_eq!(leg.mode(), TransitMode::Bus);
        assert_eq!(leg.from().name, "A1");
        assert_eq!(leg.to().name, "A2");
    }

    #[test]
    fn transit_leg_zero_duration_allowed() {
        assert!(bus("11:06", "11:06").is_ok());
    }

    #[test]
    fn transit_leg_rejects_end_before_start() {
        assert!(matches!(
            bus("11:12", "11:06"),
            Err(DomainError::InvalidLeg(_))
        ));
    }

    #[test]
    fn transit_leg_feed_comes_from_agency() {
        let leg = bus("11:06", "11:12").unwrap();
        assert_eq!(leg.feed(), "F");
        assert_eq!(leg.agency(), &id("F:AG1"));
        assert_eq!(leg.route(), &id("F:R1"));
    }

    #[test]
    fn intermediate_stops() {
        let b = FareZone::parse("F:B").unwrap();
        let leg = bus("11:06", "11:12")
            .unwrap()
            .with_intermediate_stops(vec![Place::in_zone("B1", b)]);
        assert_eq!(leg.intermediate_stops().len(), 1);
    }

    #[test]
    fn street_leg() {
        let walk = StreetLeg::new(StreetMode::Walk, time("11:10"), time("11:20")).unwrap();
        assert_eq!(walk.mode(), StreetMode::Walk);
        assert!(StreetLeg::new(StreetMode::Walk, time("11:20"), time("11:10")).is_err());
    }

    #[test]
    fn segment_accessors() {
        let ride: Segment = bus("11:06", "11:12").unwrap().into();
        let walk: Segment = StreetLeg::new(StreetMode::CarHail, time("11:12"), time("11:30"))
            .unwrap()
            .into();

        assert!(ride.is_transit());
        assert!(ride.as_transit().is_some());
        assert!(!walk.is_transit());
        assert!(walk.as_transit().is_none());
        assert_eq!(walk.start(), time("11:12"));
        assert_eq!(walk.end(), time("11:30"));
    }

    #[test]
    fn leg_index_display() {
        assert_eq!(LegIndex(3).to_string(), "3");
    }
}
