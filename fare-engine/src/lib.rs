//! Zone fare engine.
//!
//! Answers: "which tickets does a rider buy for this itinerary, and what
//! do they pay?"
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::{TimeZone, Utc};
//! use fare_engine::domain::{FareZone, FeedScopedId, Itinerary, Money, Place, TransitLeg, TransitMode};
//! use fare_engine::fares::{
//!     FareAttribute, FareCategory, FareConfig, FareRuleSet, FareService, RuleTable, ZoneFareService,
//! };
//!
//! let zone_a = FareZone::parse("HSL:A").unwrap();
//! let zone_b = FareZone::parse("HSL:B").unwrap();
//!
//! let ab = FareAttribute::builder(FeedScopedId::parse("HSL:AB").unwrap(), Money::euro_cents(280))
//!     .transfer_duration(chrono::Duration::minutes(80))
//!     .build();
//! let mut builder = RuleTable::builder();
//! builder.add_fare_rules(
//!     FareCategory::Regular,
//!     [FareRuleSet::new(ab).with_zone(zone_a.clone()).with_zone(zone_b.clone())],
//! );
//! let service = ZoneFareService::new(Arc::new(builder.build()), FareConfig::default());
//!
//! let start = Utc.with_ymd_and_hms(2024, 3, 15, 11, 20, 0).unwrap();
//! let leg = TransitLeg::new(
//!     TransitMode::Bus,
//!     Place::in_zone("Kamppi", zone_a),
//!     Place::in_zone("Pasila", zone_b),
//!     FeedScopedId::parse("HSL:AG1").unwrap(),
//!     FeedScopedId::parse("HSL:550").unwrap(),
//!     start,
//!     start + chrono::Duration::minutes(12),
//! )
//! .unwrap();
//! let itinerary = Itinerary::new(vec![leg.into()]).unwrap();
//!
//! let fares = service.calculate_fares(&itinerary).unwrap();
//! assert_eq!(fares.total(FareCategory::Regular), Some(&Money::euro_cents(280)));
//! ```

pub mod domain;
pub mod fares;
