//! Domain types for fare computation.
//!
//! This module contains the value types the fare engine consumes and
//! produces: identifiers, money, places and the itinerary contract. All
//! types enforce their invariants at construction time.

mod error;
mod feed_id;
mod itinerary;
mod leg;
mod money;
mod place;

pub use error::DomainError;
pub use feed_id::{AgencyId, FareId, FeedScopedId, InvalidFeedScopedId, RouteId};
pub use itinerary::Itinerary;
pub use leg::{LegIndex, Segment, StreetLeg, StreetMode, TransitLeg, TransitMode};
pub use money::{CurrencyCode, InvalidCurrencyCode, Money};
pub use place::{FareZone, Place};
