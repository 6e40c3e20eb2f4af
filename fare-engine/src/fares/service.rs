//! Fare service: prices itineraries against a frozen rule table.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::Itinerary;

use super::category::FareCategory;
use super::classify::{classify, ClassifiedLeg};
use super::config::FareConfig;
use super::result::{FareComponent, FareResult};
use super::segment::Segmenter;
use super::table::{CategoryRules, RuleTable};

/// Computes the fares of an itinerary.
///
/// This abstraction lets consumers swap in fixed fares for testing.
pub trait FareService: Send + Sync {
    /// Price every category for `itinerary`.
    ///
    /// Returns `None` when the itinerary has no transit leg or no category
    /// could price any of its legs.
    fn calculate_fares(&self, itinerary: &Itinerary) -> Option<FareResult>;
}

/// Zone-based fares with free transfers inside a time window.
///
/// Cheap to clone; clones share the rule table.
#[derive(Debug, Clone)]
pub struct ZoneFareService {
    table: Arc<RuleTable>,
    config: FareConfig,
}

impl ZoneFareService {
    pub fn new(table: Arc<RuleTable>, config: FareConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &Arc<RuleTable> {
        &self.table
    }

    pub fn config(&self) -> &FareConfig {
        &self.config
    }

    /// Price several itineraries in parallel. Results keep input order.
    pub fn calculate_fares_batch(&self, itineraries: &[Itinerary]) -> Vec<Option<FareResult>> {
        itineraries
            .par_iter()
            .map(|itinerary| self.calculate_fares(itinerary))
            .collect()
    }

    /// Price one category. `None` if none of its groups resolved.
    fn price_category(
        &self,
        category: FareCategory,
        rules: &CategoryRules,
        legs: &[ClassifiedLeg<'_>],
    ) -> Option<Vec<FareComponent>> {
        let groups = Segmenter::new(rules, &self.config).segment(legs);
        let components: Vec<FareComponent> = groups
            .iter()
            .filter_map(|group| FareComponent::from_group(group, legs))
            .collect();

        debug!(
            %category,
            groups = groups.len(),
            components = components.len(),
            "Priced category"
        );

        (!components.is_empty()).then_some(components)
    }
}

impl FareService for ZoneFareService {
    fn calculate_fares(&self, itinerary: &Itinerary) -> Option<FareResult> {
        let legs = classify(itinerary, self.config.zone_accounting);
        if legs.is_empty() {
            debug!("Itinerary has no transit legs");
            return None;
        }

        let mut result = FareResult::default();
        for (category, rules) in self.table.categories() {
            let Some(components) = self.price_category(category, rules, &legs) else {
                continue;
            };
            if let Err(e) = result.add_category(category, components) {
                warn!(%category, error = %e, "Dropping category with inconsistent prices");
            }
        }

        if result.is_empty() {
            debug!(legs = legs.len(), "No fare found for itinerary");
            None
        } else {
            Some(result)
        }
    }
}
