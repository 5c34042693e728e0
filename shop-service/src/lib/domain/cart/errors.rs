use thiserror::Error;

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::errors::ItemIdError;
use crate::domain::catalog::models::ItemId;

/// Error for Quantity validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Quantity must be a positive integer, got {0}")]
    NotPositive(i64),

    #[error("Quantity too large: maximum {max}, got {actual}")]
    TooLarge { max: i64, actual: i64 },
}

/// Top-level error for cart operations
#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("Invalid item ID: {0}")]
    InvalidItemId(#[from] ItemIdError),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Cart not found")]
    CartNotFound,

    #[error("Item not in cart: {0}")]
    LineNotFound(ItemId),

    #[error("Cart was modified by another request")]
    CartChanged,

    // Infrastructure errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for CartError {
    fn from(err: anyhow::Error) -> Self {
        CartError::Unknown(err.to_string())
    }
}
