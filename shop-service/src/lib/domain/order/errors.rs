use thiserror::Error;

use crate::domain::cart::errors::CartError;
use crate::domain::cart::errors::QuantityError;
use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::ItemId;

/// Error for OrderId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for OrderStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderStatusError {
    #[error("Unknown order status: {0}")]
    Unknown(String),
}

/// Top-level error for order placement and retrieval
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("Invalid order ID: {0}")]
    InvalidOrderId(#[from] OrderIdError),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Cart changed while the order was being placed")]
    CartChanged,

    // Infrastructure errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Corrupt order data: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<CartError> for OrderError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::DatabaseError(msg) => OrderError::DatabaseError(msg),
            CartError::Catalog(e) => OrderError::Catalog(e),
            CartError::CartChanged => OrderError::CartChanged,
            other => OrderError::Unknown(other.to_string()),
        }
    }
}

impl From<QuantityError> for OrderError {
    fn from(err: QuantityError) -> Self {
        OrderError::Corrupt(err.to_string())
    }
}

impl From<OrderStatusError> for OrderError {
    fn from(err: OrderStatusError) -> Self {
        OrderError::Corrupt(err.to_string())
    }
}

impl From<anyhow::Error> for OrderError {
    fn from(err: anyhow::Error) -> Self {
        OrderError::Unknown(err.to_string())
    }
}
