//! Rule table: fare rule sets per category, frozen before use.
//!
//! Rules are registered on a [`RuleTableBuilder`] and frozen with
//! [`RuleTableBuilder::build`]. The resulting [`RuleTable`] has no mutating
//! API; share it behind an `Arc` between concurrent fare computations.

use std::collections::{BTreeMap, HashMap};

use chrono::Duration;

use crate::domain::FareZone;

use super::category::FareCategory;
use super::classify::ZoneSet;
use super::rule_set::FareRuleSet;

/// Collects rule sets before the table is frozen.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::{FareZone, FeedScopedId, Money};
/// use fare_engine::fares::{FareAttribute, FareCategory, FareRuleSet, RuleTable};
///
/// let ab = FareAttribute::builder(FeedScopedId::parse("HSL:AB").unwrap(), Money::euro_cents(280)).build();
/// let rule = FareRuleSet::new(ab).with_zone(FareZone::parse("HSL:A").unwrap());
///
/// let mut builder = RuleTable::builder();
/// builder.add_fare_rules(FareCategory::Regular, [rule]);
/// let table = builder.build();
///
/// assert_eq!(table.rules(FareCategory::Regular).map(|r| r.len()), Some(1));
/// assert!(table.rules(FareCategory::Senior).is_none());
/// ```
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    categories: BTreeMap<FareCategory, Vec<FareRuleSet>>,
}

impl RuleTableBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rule sets under a category.
    ///
    /// Append-only: repeated calls for the same category add after the
    /// rules already registered. Registration order breaks price ties.
    pub fn add_fare_rules(
        &mut self,
        category: FareCategory,
        rules: impl IntoIterator<Item = FareRuleSet>,
    ) -> &mut Self {
        self.categories.entry(category).or_default().extend(rules);
        self
    }

    /// Freeze the table.
    pub fn build(self) -> RuleTable {
        let categories = self
            .categories
            .into_iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(category, rules)| (category, CategoryRules::new(rules)))
            .collect();
        RuleTable { categories }
    }
}

/// Immutable fare rules for every category.
#[derive(Debug, Default)]
pub struct RuleTable {
    categories: BTreeMap<FareCategory, CategoryRules>,
}

impl RuleTable {
    /// Start building a table.
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::new()
    }

    /// Returns the rules of one category, if any were registered.
    pub fn rules(&self, category: FareCategory) -> Option<&CategoryRules> {
        self.categories.get(&category)
    }

    /// Returns all categories with their rules, in category order.
    pub fn categories(&self) -> impl Iterator<Item = (FareCategory, &CategoryRules)> {
        self.categories.iter().map(|(category, rules)| (*category, rules))
    }

    /// Returns true if no rules were registered.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The rules of one category in registration order, plus derived lookups.
#[derive(Debug)]
pub struct CategoryRules {
    rules: Vec<FareRuleSet>,
    /// Zone -> positions (ascending) of the rules containing it.
    by_zone: HashMap<FareZone, Vec<usize>>,
    accumulation_window: Option<Duration>,
}

impl CategoryRules {
    fn new(rules: Vec<FareRuleSet>) -> Self {
        let mut by_zone: HashMap<FareZone, Vec<usize>> = HashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            for zone in rule.contains() {
                by_zone.entry(zone.clone()).or_default().push(position);
            }
        }

        let accumulation_window = rules
            .iter()
            .filter_map(|rule| rule.attribute().transfer_duration())
            .max();

        Self {
            rules,
            by_zone,
            accumulation_window,
        }
    }

    /// Returns the rules in registration order.
    pub fn as_slice(&self) -> &[FareRuleSet] {
        &self.rules
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Longest transfer duration among the rules: how long an unmatched
    /// group may keep collecting legs.
    pub fn accumulation_window(&self) -> Option<Duration> {
        self.accumulation_window
    }

    /// Rules whose zones cover `zones`, with their registration position,
    /// in registration order. Restrictions are not checked.
    pub fn covering<'r>(
        &'r self,
        zones: &ZoneSet<'_>,
    ) -> impl Iterator<Item = (usize, &'r FareRuleSet)> {
        // Any covering rule contains every zone, so scanning the shortest
        // posting list is enough. A zone no rule contains yields nothing.
        let positions: &[usize] = zones
            .iter()
            .map(|zone| self.by_zone.get(*zone).map(Vec::as_slice).unwrap_or(&[]))
            .min_by_key(|positions| positions.len())
            .unwrap_or(&[]);

        positions
            .iter()
            .map(move |&position| (position, &self.rules[position]))
            .filter(move |(_, rule)| rule.covers(zones.iter().copied()))
    }
}
