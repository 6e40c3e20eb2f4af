//! Fare attribute: a purchasable priced product.

use chrono::Duration;

use crate::domain::{AgencyId, FareId, Money};

/// A fare product: what the rider pays and what the ticket allows.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::{FeedScopedId, Money};
/// use fare_engine::fares::FareAttribute;
/// use chrono::Duration;
///
/// let ab = FareAttribute::builder(FeedScopedId::parse("HSL:AB").unwrap(), Money::euro_cents(280))
///     .transfer_duration(Duration::minutes(80))
///     .build();
///
/// assert_eq!(ab.price().minor_units(), 280);
/// assert!(ab.permits_transfer(Duration::minutes(30), 0));
/// assert!(!ab.permits_transfer(Duration::minutes(80), 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareAttribute {
    id: FareId,
    price: Money,
    transfer_duration: Option<Duration>,
    transfers: Option<u32>,
    agency: Option<AgencyId>,
}

impl FareAttribute {
    /// Start building an attribute with the given id and price.
    pub fn builder(id: FareId, price: Money) -> FareAttributeBuilder {
        FareAttributeBuilder {
            inner: FareAttribute {
                id,
                price,
                transfer_duration: None,
                transfers: None,
                agency: None,
            },
        }
    }

    /// Returns the fare id.
    pub fn id(&self) -> &FareId {
        &self.id
    }

    /// Returns the price.
    pub fn price(&self) -> &Money {
        &self.price
    }

    /// Returns how long after boarding the first leg the ticket stays valid
    /// for further rides. `None` means a single-ride ticket.
    pub fn transfer_duration(&self) -> Option<Duration> {
        self.transfer_duration
    }

    /// Returns the maximum number of free transfers. `None` means no limit
    /// other than the transfer duration.
    pub fn transfers(&self) -> Option<u32> {
        self.transfers
    }

    /// Returns the agency the product is restricted to, if any.
    pub fn agency(&self) -> Option<&AgencyId> {
        self.agency.as_ref()
    }

    /// Returns the feed the product belongs to.
    pub fn feed(&self) -> &str {
        self.id.feed()
    }

    /// Returns true if a ride boarding `elapsed` after the ticket's first
    /// boarding may use it, given `transfers_used` earlier transfers.
    pub fn permits_transfer(&self, elapsed: Duration, transfers_used: u32) -> bool {
        let within_window = self
            .transfer_duration
            .is_some_and(|window| elapsed < window);
        let transfers_left = self.transfers.is_none_or(|limit| transfers_used < limit);
        within_window && transfers_left
    }
}

/// Builder for [`FareAttribute`].
#[derive(Debug, Clone)]
pub struct FareAttributeBuilder {
    inner: FareAttribute,
}

impl FareAttributeBuilder {
    /// Set the transfer window.
    pub fn transfer_duration(mut self, window: Duration) -> Self {
        self.inner.transfer_duration = Some(window);
        self
    }

    /// Set the maximum number of free transfers.
    pub fn transfers(mut self, limit: u32) -> Self {
        self.inner.transfers = Some(limit);
        self
    }

    /// Restrict the product to one agency.
    pub fn agency(mut self, agency: AgencyId) -> Self {
        self.inner.agency = Some(agency);
        self
    }

    /// Build the attribute.
    pub fn build(self) -> FareAttribute {
        self.inner
    }
}
