//! Zone-based fare computation.
//!
//! Given an itinerary, this module works out which fare products cover its
//! transit legs and what the rider pays, per rider category:
//!
//! 1. each transit leg is reduced to the fare zones it touches ([`classify`]);
//! 2. legs are grouped greedily in travel order, a group riding on one
//!    ticket while the ticket covers its zones and the transfer window is
//!    open ([`Segmenter`]);
//! 3. every priced group becomes a [`FareComponent`], summed per category
//!    into a [`FareResult`].
//!
//! Rules are frozen into a [`RuleTable`] before use and shared read-only
//! between concurrent computations.

mod attribute;
mod category;
mod classify;
mod config;
mod result;
mod rule_set;
mod segment;
mod service;
mod table;


pub use attribute::{FareAttribute, FareAttributeBuilder};
pub use category::FareCategory;
pub use classify::{classify, ClassifiedLeg, ZoneSet};
pub use config::{FareConfig, ZoneAccounting};
pub use result::{FareComponent, FareResult};
pub use rule_set::FareRuleSet;
pub use segment::{CoverageGroup, Segmenter};
pub use service::{FareService, ZoneFareService};
pub use table::{CategoryRules, RuleTable, RuleTableBuilder};
