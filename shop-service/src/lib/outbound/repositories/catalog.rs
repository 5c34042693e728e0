use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::CatalogItem;
use crate::domain::catalog::models::ItemId;
use crate::domain::catalog::ports::Catalog;

/// Catalog reader over the `catalog_items` table.
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_item(row: PgRow) -> Result<CatalogItem, CatalogError> {
        let id: Uuid = row.try_get("id").map_err(unavailable)?;
        let name: String = row.try_get("name").map_err(unavailable)?;
        let price: Decimal = row.try_get("price").map_err(unavailable)?;
        let stock: i32 = row.try_get("stock").map_err(unavailable)?;

        Ok(CatalogItem {
            id: ItemId(id),
            name,
            price,
            stock,
        })
    }
}

fn unavailable(e: sqlx::Error) -> CatalogError {
    CatalogError::Unavailable(e.to_string())
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<CatalogItem>, CatalogError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, stock
            FROM catalog_items
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(Self::row_to_item).transpose()
    }

    async fn find_by_ids(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, price, stock
            FROM catalog_items
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.into_iter().map(Self::row_to_item).collect()
    }
}
