//! Domain error types.
//!
//! These errors represent validation failures when building itineraries,
//! legs and prices. Fare computation itself never fails: "no fare" is a
//! value, not an error.

use super::{CurrencyCode, LegIndex};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Invalid leg construction (e.g., ends before it starts)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Itinerary has no segments
    #[error("itinerary must have at least one segment")]
    EmptyItinerary,

    /// A segment starts before the one preceding it
    #[error("segment {0} starts before the previous segment")]
    SegmentsOutOfOrder(LegIndex),

    /// Two amounts in different currencies were combined
    #[error("cannot combine {0} and {1} amounts")]
    CurrencyMismatch(CurrencyCode, CurrencyCode),

    /// Amount could not be represented
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),
}
