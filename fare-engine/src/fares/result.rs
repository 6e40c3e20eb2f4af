//! Fare results: components and totals per category.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{CurrencyCode, DomainError, FareId, LegIndex, Money};

use super::category::FareCategory;
use super::classify::ClassifiedLeg;
use super::segment::CoverageGroup;

/// One purchased product and the legs it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FareComponent {
    fare_id: FareId,
    price: Money,
    legs: Vec<LegIndex>,
}

impl FareComponent {
    pub fn new(fare_id: FareId, price: Money, legs: Vec<LegIndex>) -> Self {
        Self {
            fare_id,
            price,
            legs,
        }
    }

    /// Build the component for a resolved group. Unresolved groups give
    /// `None`.
    pub(crate) fn from_group(group: &CoverageGroup<'_>, legs: &[ClassifiedLeg<'_>]) -> Option<Self> {
        let attribute = group.rule?.attribute();
        Some(Self::new(
            attribute.id().clone(),
            *attribute.price(),
            legs[group.span.clone()].iter().map(ClassifiedLeg::index).collect(),
        ))
    }

    pub fn fare_id(&self) -> &FareId {
        &self.fare_id
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn currency(&self) -> CurrencyCode {
        self.price.currency()
    }

    /// Covered itinerary segments, in order.
    pub fn legs(&self) -> &[LegIndex] {
        &self.legs
    }

    /// Returns true if the component covers the segment at `leg`.
    pub fn covers(&self, leg: LegIndex) -> bool {
        self.legs.contains(&leg)
    }
}

/// Fares of one itinerary, keyed by category.
///
/// A category is present only if at least one of its groups was priced.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::{FeedScopedId, LegIndex, Money};
/// use fare_engine::fares::{FareCategory, FareComponent, FareResult};
///
/// let ab = FareComponent::new(
///     FeedScopedId::parse("HSL:AB").unwrap(),
///     Money::euro_cents(280),
///     vec![LegIndex(0)],
/// );
/// let bc = FareComponent::new(
///     FeedScopedId::parse("HSL:BC").unwrap(),
///     Money::euro_cents(280),
///     vec![LegIndex(2)],
/// );
///
/// let mut result = FareResult::default();
/// result.add_category(FareCategory::Regular, vec![ab, bc]).unwrap();
///
/// assert_eq!(result.total(FareCategory::Regular), Some(&Money::euro_cents(560)));
/// assert_eq!(result.components_for_leg(LegIndex(2)).count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FareResult {
    components: BTreeMap<FareCategory, Vec<FareComponent>>,
    totals: BTreeMap<FareCategory, Money>,
}

impl FareResult {
    /// Record a category's components and their total.
    ///
    /// An empty component list leaves the result unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CurrencyMismatch`] if the components are priced
    /// in different currencies, or [`DomainError::InvalidAmount`] if the
    /// total overflows. The result is unchanged on error.
    pub fn add_category(
        &mut self,
        category: FareCategory,
        components: Vec<FareComponent>,
    ) -> Result<(), DomainError> {
        let Some((first, rest)) = components.split_first() else {
            return Ok(());
        };

        let total = rest
            .iter()
            .try_fold(first.price, |total, component| total.checked_add(&component.price))?;

        self.totals.insert(category, total);
        self.components.insert(category, components);
        Ok(())
    }

    /// Components of a category, in itinerary order. Empty if absent.
    pub fn components(&self, category: FareCategory) -> &[FareComponent] {
        self.components
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total(&self, category: FareCategory) -> Option<&Money> {
        self.totals.get(&category)
    }

    /// Categories with a fare, in category order.
    pub fn categories(&self) -> impl Iterator<Item = FareCategory> + '_ {
        self.totals.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Every component, in any category, that covers the segment at `leg`.
    pub fn components_for_leg(
        &self,
        leg: LegIndex,
    ) -> impl Iterator<Item = (FareCategory, &FareComponent)> + '_ {
        self.components.iter().flat_map(move |(category, components)| {
            components
                .iter()
                .filter(move |component| component.covers(leg))
                .map(move |component| (*category, component))
        })
    }
}
