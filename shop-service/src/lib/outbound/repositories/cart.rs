use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::account::models::AccountId;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::models::Cart;
use crate::domain::cart::models::CartLine;
use crate::domain::cart::models::Quantity;
use crate::domain::cart::ports::CartRepository;
use crate::domain::catalog::models::ItemId;

/// Carts stored as a `carts` header row plus positioned `cart_lines`.
///
/// Every save bumps `carts.version`, and only lands on the version it read.
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> CartError {
    CartError::DatabaseError(e.to_string())
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find(&self, account_id: &AccountId) -> Result<Option<Cart>, CartError> {
        // One statement so header and lines come from the same snapshot.
        let rows = sqlx::query(
            r#"
            SELECT c.version, c.updated_at, l.item_id, l.quantity
            FROM carts c
            LEFT JOIN cart_lines l ON l.account_id = c.account_id
            WHERE c.account_id = $1
            ORDER BY l.position
            "#,
        )
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };
        let version: i64 = first.try_get("version").map_err(database_error)?;
        let updated_at: DateTime<Utc> = first.try_get("updated_at").map_err(database_error)?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in &rows {
            let item_id: Option<Uuid> = row.try_get("item_id").map_err(database_error)?;
            let quantity: Option<i32> = row.try_get("quantity").map_err(database_error)?;
            if let (Some(item_id), Some(quantity)) = (item_id, quantity) {
                lines.push(CartLine {
                    item_id: ItemId(item_id),
                    quantity: Quantity::new(i64::from(quantity))?,
                });
            }
        }

        Ok(Some(Cart::restore(*account_id, lines, version, updated_at)?))
    }

    async fn save(&self, mut cart: Cart) -> Result<Cart, CartError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Version 0 means no stored cart was read, so only a fresh insert may land
        let written = if cart.version == 0 {
            sqlx::query(
                r#"
                INSERT INTO carts (account_id, version, updated_at)
                VALUES ($1, 1, $2)
                ON CONFLICT (account_id) DO NOTHING
                RETURNING version
                "#,
            )
            .bind(cart.account_id.0)
            .bind(cart.updated_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?
        } else {
            sqlx::query(
                r#"
                UPDATE carts
                SET version = version + 1, updated_at = $3
                WHERE account_id = $1 AND version = $2
                RETURNING version
                "#,
            )
            .bind(cart.account_id.0)
            .bind(cart.version)
            .bind(cart.updated_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?
        };

        let Some(row) = written else {
            tx.rollback().await.map_err(database_error)?;
            tracing::warn!(
                account_id = %cart.account_id,
                expected_version = cart.version,
                "Cart changed before save"
            );
            return Err(CartError::CartChanged);
        };
        let version: i64 = row.try_get("version").map_err(database_error)?;

        sqlx::query("DELETE FROM cart_lines WHERE account_id = $1")
            .bind(cart.account_id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        for (position, line) in cart.lines().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_lines (account_id, item_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(cart.account_id.0)
            .bind(line.item_id.0)
            .bind(line.quantity.get())
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        tx.commit().await.map_err(database_error)?;

        cart.version = version;
        Ok(cart)
    }
}
