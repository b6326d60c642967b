//! Newtype IDs for type-safe entity references.
//!
//! Product identifiers arrive from request input and from the product file as
//! opaque strings. They are compared by exact equality and never parsed.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a product in the catalog.
///
/// A cart line item only references a product through this ID; the product
/// itself is owned by the catalog and may disappear independently.
///
/// # Example
///
/// ```rust
/// # use flatcart_core::ProductId;
/// let id = ProductId::new("p1");
/// assert_eq!(id.as_str(), "p1");
/// assert_eq!(id, ProductId::from("p1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the ID is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ProductId::new("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");

        let parsed: ProductId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_equality_is_exact() {
        assert_ne!(ProductId::new("p1"), ProductId::new("P1"));
        assert_ne!(ProductId::new("p1"), ProductId::new(" p1"));
    }

    #[test]
    fn test_is_blank() {
        assert!(ProductId::new("").is_blank());
        assert!(ProductId::new("  \t").is_blank());
        assert!(!ProductId::new("p1").is_blank());
    }
}
