use std::fmt;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::catalog::errors::ItemIdError;

/// Catalog item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an item ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ItemIdError> {
        Uuid::parse_str(s)
            .map(ItemId)
            .map_err(|e| ItemIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Read-only view of a catalog entry.
///
/// `stock` is informational; nothing here checks or decrements it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}
