//! Segmentation of an itinerary's transit legs into coverage groups.
//!
//! The pass mirrors how a rider validates tickets: the first leg buys the
//! ticket matching where it goes, following legs ride on it while it still
//! covers them and the transfer window is open, and the moment it stops
//! covering the rider a new ticket is bought for the next leg alone. There
//! is no look-ahead and no retroactive merge into a wider ticket.

use std::ops::Range;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::classify::{ClassifiedLeg, ZoneSet};
use super::config::FareConfig;
use super::rule_set::FareRuleSet;
use super::table::CategoryRules;

/// A run of consecutive transit legs and the rule that prices it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageGroup<'r> {
    /// Positions in the classified leg slice.
    pub span: Range<usize>,
    /// Matched rule, or `None` when nothing covers the group.
    pub rule: Option<&'r FareRuleSet>,
}

impl CoverageGroup<'_> {
    /// Returns true if a rule priced this group.
    pub fn is_resolved(&self) -> bool {
        self.rule.is_some()
    }
}

/// The group currently being extended.
#[derive(Debug)]
struct OpenGroup<'i, 'r> {
    start: usize,
    end: usize,
    zones: ZoneSet<'i>,
    anchor: DateTime<Utc>,
    rule: Option<&'r FareRuleSet>,
    transfers_used: u32,
}

/// Groups legs and resolves each group against one category's rules.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'r> {
    rules: &'r CategoryRules,
    config: &'r FareConfig,
}

impl<'r> Segmenter<'r> {
    /// Create a segmenter over one category's rules.
    pub fn new(rules: &'r CategoryRules, config: &'r FareConfig) -> Self {
        Self { rules, config }
    }

    /// Split `legs` into coverage groups, in order.
    ///
    /// Every leg ends up in exactly one group; groups no rule covers come
    /// back with `rule: None`.
    pub fn segment(&self, legs: &[ClassifiedLeg<'_>]) -> Vec<CoverageGroup<'r>> {
        let mut groups = Vec::new();
        let mut open: Option<OpenGroup<'_, 'r>> = None;

        for position in 0..legs.len() {
            let Some(mut group) = open.take() else {
                open = Some(self.open_group(legs, position));
                continue;
            };

            if self.absorb(&mut group, legs, position) || self.accumulate(&mut group, legs, position)
            {
                open = Some(group);
                continue;
            }

            groups.push(self.close(group, legs));
            open = Some(self.open_group(legs, position));
        }

        if let Some(group) = open {
            groups.push(self.close(group, legs));
        }

        groups
    }

    /// Pick the rule for `zones` over the legs `run`.
    ///
    /// Candidates cover the zones and accept every leg. Restricted rules
    /// (agency or route) win over generic ones; within a tier the lowest
    /// price wins, then the earliest registration.
    pub fn resolve(&self, zones: &ZoneSet<'_>, run: &[ClassifiedLeg<'_>]) -> Option<&'r FareRuleSet> {
        self.rules
            .covering(zones)
            .filter(|(_, rule)| run.iter().all(|leg| rule.accepts(leg)))
            .min_by_key(|(position, rule)| {
                (
                    !rule.is_restricted(),
                    rule.attribute().price().minor_units(),
                    *position,
                )
            })
            .map(|(_, rule)| rule)
    }

    fn open_group<'i>(&self, legs: &[ClassifiedLeg<'i>], position: usize) -> OpenGroup<'i, 'r> {
        let leg = &legs[position];
        let zones = leg.zones().clone();
        let rule = self.resolve(&zones, &legs[position..=position]);

        trace!(
            leg = %leg.index(),
            zones = zones.len(),
            fare_id = ?rule.map(|r| r.attribute().id()),
            "Opened coverage group"
        );

        OpenGroup {
            start: position,
            end: position + 1,
            zones,
            anchor: leg.start(),
            rule,
            transfers_used: 0,
        }
    }

    /// Ride on the group's ticket, if it covers the leg and is still valid.
    fn absorb(&self, group: &mut OpenGroup<'_, 'r>, legs: &[ClassifiedLeg<'_>], position: usize) -> bool {
        let Some(rule) = group.rule else {
            return false;
        };
        let leg = &legs[position];

        if !rule.covers(leg.zones().iter().copied()) || !rule.accepts(leg) {
            return false;
        }

        let elapsed = leg.start().signed_duration_since(group.anchor);
        if !rule.attribute().permits_transfer(elapsed, group.transfers_used) {
            return false;
        }

        trace!(
            leg = %leg.index(),
            fare_id = %rule.attribute().id(),
            elapsed_secs = elapsed.num_seconds(),
            "Leg rides on open ticket"
        );

        group.end = position + 1;
        group.transfers_used += 1;
        true
    }

    /// Merge an unmatched leg into a group no rule covers.
    ///
    /// A superset test never matches a union of zone-sets that each failed
    /// alone, so the group stays unresolved; this only keeps uncovered runs
    /// together. A leg that resolves on its own starts a new group instead.
    fn accumulate<'i>(
        &self,
        group: &mut OpenGroup<'i, 'r>,
        legs: &[ClassifiedLeg<'i>],
        position: usize,
    ) -> bool {
        if group.rule.is_some() || !self.config.accumulate_unmatched {
            return false;
        }
        let Some(window) = self.rules.accumulation_window() else {
            return false;
        };

        let leg = &legs[position];
        if group.zones.is_empty()
            || leg.zones().is_empty()
            || leg.feed() != legs[group.start].feed()
            || leg.start().signed_duration_since(group.anchor) >= window
            || self.resolve(leg.zones(), &legs[position..=position]).is_some()
        {
            return false;
        }

        trace!(
            leg = %leg.index(),
            legs = position + 1 - group.start,
            "Accumulating unmatched legs"
        );

        group.zones.extend(leg.zones().iter().copied());
        group.end = position + 1;
        true
    }

    fn close(&self, group: OpenGroup<'_, 'r>, legs: &[ClassifiedLeg<'_>]) -> CoverageGroup<'r> {
        let span = group.start..group.end;
        match group.rule {
            Some(rule) => debug!(
                first_leg = %legs[span.start].index(),
                legs = span.len(),
                fare_id = %rule.attribute().id(),
                price = %rule.attribute().price(),
                "Coverage group resolved"
            ),
            None => debug!(
                first_leg = %legs[span.start].index(),
                legs = span.len(),
                zones = group.zones.len(),
                "No fare rule covers group, legs excluded"
            ),
        }

        CoverageGroup {
            span,
            rule: group.rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FareZone, FeedScopedId, Itinerary, Money, Place, Segment, TransitLeg, TransitMode};
    use crate::fares::attribute::FareAttribute;
    use crate::fares::category::FareCategory;
    use crate::fares::classify::classify;
    use crate::fares::config::ZoneAccounting;
    use crate::fares::table::RuleTable;
    use chrono::{Duration, NaiveDate, NaiveTime};

    fn time(s: &str) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let time = NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .unwrap();
        date.and_time(time).and_utc()
    }

    fn zone(s: &str) -> FareZone {
        FareZone::parse(&format!("F:{s}")).unwrap()
    }

    fn id(s: &str) -> FeedScopedId {
        FeedScopedId::parse(s).unwrap()
    }

    fn rule(fare_id: &str, cents: u64, zones: &[&str]) -> FareRuleSet {
        let attribute = FareAttribute::builder(id(&format!("F:{fare_id}")), Money::euro_cents(cents))
            .transfer_duration(Duration::seconds(300))
            .build();
        zones
            .iter()
            .fold(FareRuleSet::new(attribute), |r, z| r.with_zone(zone(z)))
    }

    fn bus(from: &str, to: &str, start: &str, end: &str) -> Segment {
        bus_by("F:AG1", from, to, start, end)
    }

    fn bus_by(agency: &str, from: &str, to: &str, start: &str, end: &str) -> Segment {
        let place = |z: &str| {
            if z.is_empty() {
                Place::new("outside")
            } else {
                Place::in_zone(format!("{z}1"), zone(z))
            }
        };
        let agency = id(agency);
        let route = FeedScopedId::new(agency.feed(), "R1").unwrap();
        TransitLeg::new(
            TransitMode::Bus,
            place(from),
            place(to),
            agency,
            route,
            time(start),
            time(end),
        )
        .unwrap()
        .into()
    }

    fn table(rules: Vec<FareRuleSet>) -> RuleTable {
        let mut builder = RuleTable::builder();
        builder.add_fare_rules(FareCategory::Regular, rules);
        builder.build()
    }

    /// (span, fare id) for every group.
    fn run(table: &RuleTable, config: &FareConfig, segments: Vec<Segment>) -> Vec<(Range<usize>, Option<String>)> {
        let itinerary = Itinerary::new(segments).unwrap();
        let legs = classify(&itinerary, config.zone_accounting);
        let rules = table.rules(FareCategory::Regular).unwrap();
        Segmenter::new(rules, config)
            .segment(&legs)
            .into_iter()
            .map(|g| (g.span, g.rule.map(|r| r.attribute().id().id().to_string())))
            .collect()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn single_leg_single_group() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let groups = run(&table, &FareConfig::default(), vec![bus("A", "A", "11:06", "11:12")]);
        assert_eq!(groups, vec![(0..1, some("AB"))]);
    }

    #[test]
    fn no_retroactive_merge() {
        let table = table(vec![
            rule("AB", 280, &["A", "B"]),
            rule("BC", 280, &["B", "C"]),
            rule("ABC", 410, &["A", "B", "C"]),
        ]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("A", "B", "11:00", "11:00"), bus("B", "C", "11:03", "11:10")],
        );
        assert_eq!(groups, vec![(0..1, some("AB")), (1..2, some("BC"))]);
    }

    #[test]
    fn covered_leg_within_window_absorbed() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("A", "A", "11:00", "11:02"), bus("A", "B", "11:04:59", "11:10")],
        );
        assert_eq!(groups, vec![(0..2, some("AB"))]);
    }

    #[test]
    fn covered_leg_after_window_starts_new_group() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("A", "A", "11:00", "11:02"), bus("A", "A", "11:05", "11:10")],
        );
        assert_eq!(groups, vec![(0..1, some("AB")), (1..2, some("AB"))]);
    }

    #[test]
    fn window_anchored_at_first_boarding() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        // Third leg is within 5 minutes of the second but not of the first.
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![
                bus("A", "A", "11:00", "11:01"),
                bus("A", "A", "11:03", "11:04"),
                bus("A", "A", "11:06", "11:07"),
            ],
        );
        assert_eq!(groups, vec![(0..2, some("AB")), (2..3, some("AB"))]);
    }

    #[test]
    fn absorption_checks_rule_restrictions() {
        let d2 = FareAttribute::builder(id("F:D2"), Money::euro_cents(250))
            .transfer_duration(Duration::minutes(30))
            .build();
        let table = table(vec![
            rule("D", 280, &["D"]),
            FareRuleSet::new(d2).with_zone(zone("D")).with_agency(id("F:AG2")),
        ]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![
                bus_by("F:AG2", "D", "D", "11:00", "11:02"),
                bus_by("F:AG1", "D", "D", "11:03", "11:05"),
            ],
        );
        assert_eq!(groups, vec![(0..1, some("D2")), (1..2, some("D"))]);
    }

    #[test]
    fn transfer_limit_exhausted() {
        let once = FareAttribute::builder(id("F:AB"), Money::euro_cents(280))
            .transfer_duration(Duration::minutes(60))
            .transfers(1)
            .build();
        let table = table(vec![FareRuleSet::new(once).with_zone(zone("A"))]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![
                bus("A", "A", "11:00", "11:05"),
                bus("A", "A", "11:10", "11:15"),
                bus("A", "A", "11:20", "11:25"),
            ],
        );
        assert_eq!(groups, vec![(0..2, some("AB")), (2..3, some("AB"))]);
    }

    #[test]
    fn uncovered_leg_after_resolved_group() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("A", "A", "11:06", "11:12"), bus("E", "E", "11:13", "11:20")],
        );
        assert_eq!(groups, vec![(0..1, some("AB")), (1..2, None)]);
    }

    #[test]
    fn uncovered_legs_accumulate_into_one_group() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let segments = || {
            vec![
                bus("E", "E", "11:00", "11:01"),
                bus("E", "G", "11:02", "11:03"),
                bus("A", "B", "11:04", "11:10"),
            ]
        };

        let groups = run(&table, &FareConfig::default(), segments());
        assert_eq!(groups, vec![(0..2, None), (2..3, some("AB"))]);

        let no_accumulation = FareConfig::new(ZoneAccounting::BoardAlight, false);
        let groups = run(&table, &no_accumulation, segments());
        assert_eq!(groups, vec![(0..1, None), (1..2, None), (2..3, some("AB"))]);
    }

    #[test]
    fn accumulation_respects_window() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("E", "E", "11:00", "11:01"), bus("G", "G", "11:05", "11:06")],
        );
        assert_eq!(groups, vec![(0..1, None), (1..2, None)]);
    }

    #[test]
    fn accumulation_never_spans_feeds() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let foreign = TransitLeg::new(
            TransitMode::Bus,
            Place::in_zone("Y1", FareZone::parse("G:Y").unwrap()),
            Place::in_zone("W1", FareZone::parse("G:W").unwrap()),
            id("G:AG9"),
            id("G:R9"),
            time("11:02"),
            time("11:03"),
        )
        .unwrap()
        .into();
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("E", "E", "11:00", "11:01"), foreign],
        );
        assert_eq!(groups, vec![(0..1, None), (1..2, None)]);
    }

    #[test]
    fn accumulation_skips_legs_outside_network() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("E", "E", "11:00", "11:01"), bus("", "", "11:02", "11:03")],
        );
        assert_eq!(groups, vec![(0..1, None), (1..2, None)]);
    }

    #[test]
    fn leg_outside_network_never_absorbed() {
        let table = table(vec![rule("AB", 280, &["A", "B"])]);
        let groups = run(
            &table,
            &FareConfig::default(),
            vec![bus("A", "A", "11:00", "11:01"), bus("", "", "11:02", "11:03")],
        );
        assert_eq!(groups, vec![(0..1, some("AB")), (1..2, None)]);
    }

    #[test]
    fn resolve_prefers_restricted_then_cheapest_then_earliest() {
        let expensive_override = FareAttribute::builder(id("F:OVR"), Money::euro_cents(900)).build();
        let table = table(vec![
            rule("FIRST", 280, &["A"]),
            rule("CHEAP", 200, &["A"]),
            rule("SECOND", 200, &["A", "B"]),
            FareRuleSet::new(expensive_override)
                .with_zone(zone("A"))
                .with_agency(id("F:AG2")),
        ]);
        let rules = table.rules(FareCategory::Regular).unwrap();
        let config = FareConfig::default();
        let segmenter = Segmenter::new(rules, &config);

        let itinerary = Itinerary::new(vec![
            bus_by("F:AG1", "A", "A", "11:00", "11:01"),
            bus_by("F:AG2", "A", "A", "11:00", "11:01"),
        ])
        .unwrap();
        let legs = classify(&itinerary, ZoneAccounting::BoardAlight);

        let generic = segmenter.resolve(legs[0].zones(), &legs[0..1]).unwrap();
        assert_eq!(generic.attribute().id().id(), "CHEAP");

        let restricted = segmenter.resolve(legs[1].zones(), &legs[1..2]).unwrap();
        assert_eq!(restricted.attribute().id().id(), "OVR");
    }
}
