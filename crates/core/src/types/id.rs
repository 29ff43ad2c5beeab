//! Newtype IDs for type-safe entity references.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to an order by the store that persisted it.
///
/// Stores choose their own representation (a MongoDB `ObjectId` in hex,
/// a UUID for the in-memory store), so the ID is kept opaque.
///
/// ```
/// use candy_shop_core::OrderId;
///
/// let id = OrderId::new("65f1c0ffee00000000000001");
/// assert_eq!(id.as_str(), "65f1c0ffee00000000000001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new ID from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_inner() {
        let id = OrderId::new("abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_serde_transparent() {
        let id = OrderId::new("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
    }
}
