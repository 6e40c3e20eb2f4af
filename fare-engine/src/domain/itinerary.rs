//! Itinerary type.
//!
//! An `Itinerary` is the ordered list of segments produced by the trip
//! planner. The fare engine only reads it.

use chrono::{DateTime, Duration, Utc};

use super::{DomainError, LegIndex, Segment, TransitLeg};

/// A complete trip from origin to destination.
///
/// # Invariants
///
/// - At least one segment
/// - Segments are in start-time order (equal start times are allowed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    segments: Vec<Segment>,
}

impl Itinerary {
    /// Constructs an itinerary from segments.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - Segments list is empty
    /// - A segment starts before the previous one
    pub fn new(segments: Vec<Segment>) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for (i, window) in segments.windows(2).enumerate() {
            if window[1].start() < window[0].start() {
                return Err(DomainError::SegmentsOutOfOrder(LegIndex(i + 1)));
            }
        }

        Ok(Itinerary { segments })
    }

    /// Returns all segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the segment at `index`, if any.
    pub fn segment(&self, index: LegIndex) -> Option<&Segment> {
        self.segments.get(index.0)
    }

    /// Returns the number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns transit legs in order, with their position in the itinerary.
    pub fn transit_legs(&self) -> impl Iterator<Item = (LegIndex, &TransitLeg)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, segment)| segment.as_transit().map(|leg| (LegIndex(i), leg)))
    }

    /// Returns the number of transit legs.
    pub fn transit_leg_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_transit()).count()
    }

    /// Returns the start of the first segment.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.segments.first().map(Segment::start).unwrap_or_default()
    }

    /// Returns the latest end among all segments.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.segments
            .iter()
            .map(Segment::end)
            .max()
            .unwrap_or_default()
    }

    /// Returns the total duration.
    pub fn duration(&self) -> Duration {
        self.end_time().signed_duration_since(self.start_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FareZone, FeedScopedId, Place, StreetLeg, StreetMode, TransitMode};
    use chrono::{NaiveDate, NaiveTime};

    fn time(s: &str) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let time = NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        date.and_time(time).and_utc()
    }

    fn bus(start: &str, end: &str) -> Segment {
        let d = FareZone::parse("F:D").unwrap();
        TransitLeg::new(
            TransitMode::Bus,
            Place::in_zone("D1", d.clone()),
            Place::in_zone("D2", d),
            FeedScopedId::parse("F:AG1").unwrap(),
            FeedScopedId::parse("F:R1").unwrap(),
            time(start),
            time(end),
        )
        .unwrap()
        .into()
    }

    fn walk(start: &str, end: &str) -> Segment {
        StreetLeg::new(StreetMode::Walk, time(start), time(end))
            .unwrap()
            .into()
    }

    #[test]
    fn empty_itinerary_rejected() {
        assert_eq!(Itinerary::new(vec![]), Err(DomainError::EmptyItinerary));
    }

    #[test]
    fn out_of_order_rejected() {
        let result = Itinerary::new(vec![bus("11:20", "11:30"), bus("11:06", "11:10")]);
        assert_eq!(result, Err(DomainError::SegmentsOutOfOrder(LegIndex(1))));
    }

    #[test]
    fn equal_start_times_allowed() {
        assert!(Itinerary::new(vec![bus("11:06", "11:12"), bus("11:06", "11:12")]).is_ok());
    }

    #[test]
    fn transit_legs_keep_itinerary_positions() {
        let itinerary = Itinerary::new(vec![
            bus("11:06", "11:10"),
            walk("11:10", "11:20"),
            bus("11:20", "11:30"),
        ])
        .unwrap();

        let positions: Vec<LegIndex> = itinerary.transit_legs().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![LegIndex(0), LegIndex(2)]);
        assert_eq!(itinerary.transit_leg_count(), 2);
        assert_eq!(itinerary.segment_count(), 3);
        assert!(itinerary.segment(LegIndex(1)).is_some_and(|s| !s.is_transit()));
        assert!(itinerary.segment(LegIndex(3)).is_none());
    }

    #[test]
    fn times_and_duration() {
        let itinerary = Itinerary::new(vec![walk("11:00", "11:06"), bus("11:06", "11:30")]).unwrap();
        assert_eq!(itinerary.start_time(), time("11:00"));
        assert_eq!(itinerary.end_time(), time("11:30"));
        assert_eq!(itinerary.duration(), Duration::minutes(30));
    }

    #[test]
    fn walk_only_itinerary_has_no_transit() {
        let itinerary = Itinerary::new(vec![walk("11:00", "11:20")]).unwrap();
        assert_eq!(itinerary.transit_legs().count(), 0);
    }
}
