//! Leg classification.
//!
//! Reduces each transit leg of an itinerary to what fare matching looks at:
//! the zones it touches, who operates it, and when it starts. Street legs
//! are skipped.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::{AgencyId, FareZone, Itinerary, LegIndex, RouteId, TransitLeg};

use super::config::ZoneAccounting;

/// Zones touched by a leg or a group of legs.
pub type ZoneSet<'a> = BTreeSet<&'a FareZone>;

/// A transit leg as seen by fare matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLeg<'a> {
    index: LegIndex,
    leg: &'a TransitLeg,
    zones: ZoneSet<'a>,
}

impl<'a> ClassifiedLeg<'a> {
    /// Classify a single transit leg found at `index`.
    pub fn new(index: LegIndex, leg: &'a TransitLeg, accounting: ZoneAccounting) -> Self {
        let mut zones: ZoneSet<'a> = leg.from().zones().iter().chain(leg.to().zones()).collect();
        if accounting == ZoneAccounting::AllStops {
            zones.extend(leg.intermediate_stops().iter().flat_map(|stop| stop.zones()));
        }

        Self { index, leg, zones }
    }

    /// Position of the leg in its itinerary.
    pub fn index(&self) -> LegIndex {
        self.index
    }

    /// The underlying leg.
    pub fn leg(&self) -> &'a TransitLeg {
        self.leg
    }

    /// Zones touched. Empty when the leg runs entirely outside the fare
    /// network.
    pub fn zones(&self) -> &ZoneSet<'a> {
        &self.zones
    }

    /// Operating agency.
    pub fn agency(&self) -> &'a AgencyId {
        self.leg.agency()
    }

    /// Route.
    pub fn route(&self) -> &'a RouteId {
        self.leg.route()
    }

    /// Feed of the operating agency.
    pub fn feed(&self) -> &'a str {
        self.leg.feed()
    }

    /// Boarding instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.leg.start()
    }
}

/// Classify every transit leg of an itinerary, in order.
pub fn classify(itinerary: &Itinerary, accounting: ZoneAccounting) -> Vec<ClassifiedLeg<'_>> {
    itinerary
        .transit_legs()
        .map(|(index, leg)| ClassifiedLeg::new(index, leg, accounting))
        .collect()
}
