use thiserror::Error;

/// Error for ItemId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Failure reading from the catalog.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}
