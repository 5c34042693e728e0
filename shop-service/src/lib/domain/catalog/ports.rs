use async_trait::async_trait;

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::CatalogItem;
use crate::domain::catalog::models::ItemId;

/// Read access to the external product catalog.
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Look up a single item.
    ///
    /// # Returns
    /// Optional item (None if unknown to the catalog)
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<CatalogItem>, CatalogError>;

    /// Look up several items at their current prices.
    ///
    /// # Returns
    /// Found items, unknown IDs are skipped without error
    async fn find_by_ids(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError>;
}
