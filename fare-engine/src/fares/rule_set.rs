//! Fare rule set: a coverage predicate bound to a fare product.

use std::collections::BTreeSet;

use crate::domain::{AgencyId, FareZone, RouteId};

use super::attribute::FareAttribute;
use super::classify::ClassifiedLeg;

/// A coverage predicate plus the product it unlocks.
///
/// The predicate is a conjunction of independently optional constraints:
///
/// - zones: the group's zone-set must be a subset of `contains`;
/// - feed: the leg's feed must be the product's feed;
/// - agency: if set (on the rule, or failing that on the attribute), the
///   leg's agency must equal it;
/// - routes: if non-empty, the leg's route must be one of them.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::{FareZone, FeedScopedId, Money};
/// use fare_engine::fares::{FareAttribute, FareRuleSet};
///
/// let ab = FareAttribute::builder(FeedScopedId::parse("HSL:AB").unwrap(), Money::euro_cents(280)).build();
/// let rule = FareRuleSet::new(ab)
///     .with_zone(FareZone::parse("HSL:A").unwrap())
///     .with_zone(FareZone::parse("HSL:B").unwrap());
///
/// assert_eq!(rule.contains().len(), 2);
/// assert!(!rule.is_restricted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareRuleSet {
    attribute: FareAttribute,
    contains: BTreeSet<FareZone>,
    agency: Option<AgencyId>,
    routes: BTreeSet<RouteId>,
}

impl FareRuleSet {
    /// Create a rule set covering no zones yet.
    pub fn new(attribute: FareAttribute) -> Self {
        Self {
            attribute,
            contains: BTreeSet::new(),
            agency: None,
            routes: BTreeSet::new(),
        }
    }

    /// Add a zone the product is valid in.
    pub fn add_contains(&mut self, zone: FareZone) {
        self.contains.insert(zone);
    }

    /// Add a zone, builder style.
    pub fn with_zone(mut self, zone: FareZone) -> Self {
        self.add_contains(zone);
        self
    }

    /// Restrict the rule to one agency.
    pub fn with_agency(mut self, agency: AgencyId) -> Self {
        self.agency = Some(agency);
        self
    }

    /// Restrict the rule to a route. May be called several times.
    pub fn with_route(mut self, route: RouteId) -> Self {
        self.routes.insert(route);
        self
    }

    /// Returns the product.
    pub fn attribute(&self) -> &FareAttribute {
        &self.attribute
    }

    /// Returns the zones the product is valid in.
    pub fn contains(&self) -> &BTreeSet<FareZone> {
        &self.contains
    }

    /// Returns the effective agency restriction: the rule's own, or else the
    /// attribute's.
    pub fn agency(&self) -> Option<&AgencyId> {
        self.agency.as_ref().or(self.attribute.agency())
    }

    /// Returns the route restriction. Empty means any route.
    pub fn routes(&self) -> &BTreeSet<RouteId> {
        &self.routes
    }

    /// Returns true if the rule carries an agency or route restriction.
    ///
    /// Restricted rules are operator overrides and win over generic ones.
    pub fn is_restricted(&self) -> bool {
        self.agency().is_some() || !self.routes.is_empty()
    }

    /// Returns true if `zones` is non-empty and every zone is covered.
    pub fn covers<'z>(&self, zones: impl IntoIterator<Item = &'z FareZone>) -> bool {
        let mut zones = zones.into_iter().peekable();
        if zones.peek().is_none() {
            return false;
        }
        zones.all(|zone| self.contains.contains(zone))
    }

    /// Returns true if the feed, agency and route restrictions accept `leg`.
    /// Zones are not checked.
    pub fn accepts(&self, leg: &ClassifiedLeg<'_>) -> bool {
        leg.feed() == self.attribute.feed()
            && self.agency().is_none_or(|agency| agency == leg.agency())
            && (self.routes.is_empty() || self.routes.contains(leg.route()))
    }
}
