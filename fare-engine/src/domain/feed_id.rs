//! Feed-scoped identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an invalid feed-scoped id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid feed-scoped id: {reason}")]
pub struct InvalidFeedScopedId {
    reason: &'static str,
}

/// An identifier qualified by the feed (data source) it comes from.
///
/// Two providers may both publish an agency called "1" or a zone called
/// "A"; the feed keeps them apart. The textual form is `feed:id`.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::FeedScopedId;
///
/// let id = FeedScopedId::parse("HSL:AB").unwrap();
/// assert_eq!(id.feed(), "HSL");
/// assert_eq!(id.id(), "AB");
/// assert_eq!(id.to_string(), "HSL:AB");
///
/// // Both halves are required
/// assert!(FeedScopedId::parse("HSL:").is_err());
/// assert!(FeedScopedId::parse("AB").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedScopedId {
    feed: String,
    id: String,
}

/// Identifies a transit operator.
pub type AgencyId = FeedScopedId;

/// Identifies a route.
pub type RouteId = FeedScopedId;

/// Identifies a fare product.
pub type FareId = FeedScopedId;

impl FeedScopedId {
    /// Create an id from its two halves.
    ///
    /// The feed must be non-empty and must not contain `:`; the local id
    /// must be non-empty.
    pub fn new(feed: impl Into<String>, id: impl Into<String>) -> Result<Self, InvalidFeedScopedId> {
        let feed = feed.into();
        let id = id.into();

        if feed.is_empty() {
            return Err(InvalidFeedScopedId {
                reason: "feed cannot be empty",
            });
        }
        if feed.contains(':') {
            return Err(InvalidFeedScopedId {
                reason: "feed cannot contain ':'",
            });
        }
        if id.is_empty() {
            return Err(InvalidFeedScopedId {
                reason: "id cannot be empty",
            });
        }

        Ok(FeedScopedId { feed, id })
    }

    /// Parse the `feed:id` form. The split happens at the first `:`.
    pub fn parse(s: &str) -> Result<Self, InvalidFeedScopedId> {
        let (feed, id) = s.split_once(':').ok_or(InvalidFeedScopedId {
            reason: "expected feed:id",
        })?;
        Self::new(feed, id)
    }

    /// Returns the feed half.
    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// Returns the feed-local half.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if both ids come from the same feed.
    pub fn same_feed(&self, other: &FeedScopedId) -> bool {
        self.feed == other.feed
    }
}

impl fmt::Debug for FeedScopedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedScopedId({}:{})", self.feed, self.id)
    }
}

impl fmt::Display for FeedScopedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.feed, self.id)
    }
}

impl TryFrom<String> for FeedScopedId {
    type Error = InvalidFeedScopedId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FeedScopedId> for String {
    fn from(value: FeedScopedId) -> Self {
        value.to_string()
    }
}
