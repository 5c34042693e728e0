use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::account::models::AccountId;
use crate::domain::cart::models::Cart;
use crate::domain::cart::models::Quantity;
use crate::domain::catalog::models::ItemId;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::OrderLine;
use crate::domain::order::models::OrderStatus;
use crate::domain::order::ports::OrderRepository;

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_lines(
        &self,
        order_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<OrderLine>>, OrderError> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, item_id, quantity, price_at_purchase
            FROM order_lines
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let mut lines: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            let order_id: Uuid = row.try_get("order_id").map_err(database_error)?;
            let item_id: Uuid = row.try_get("item_id").map_err(database_error)?;
            let quantity: i32 = row.try_get("quantity").map_err(database_error)?;
            let price_at_purchase: Decimal =
                row.try_get("price_at_purchase").map_err(database_error)?;

            lines.entry(order_id).or_default().push(OrderLine {
                item_id: ItemId(item_id),
                quantity: Quantity::new(i64::from(quantity))?,
                price_at_purchase,
            });
        }

        Ok(lines)
    }

    fn row_to_order(
        row: &PgRow,
        lines: &mut HashMap<Uuid, Vec<OrderLine>>,
    ) -> Result<Order, OrderError> {
        let id: Uuid = row.try_get("id").map_err(database_error)?;
        let account_id: Uuid = row.try_get("account_id").map_err(database_error)?;
        let total_amount: Decimal = row.try_get("total_amount").map_err(database_error)?;
        let status: String = row.try_get("status").map_err(database_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(database_error)?;

        Ok(Order::restore(
            OrderId(id),
            AccountId(account_id),
            lines.remove(&id).unwrap_or_default(),
            total_amount,
            status.parse::<OrderStatus>()?,
            created_at,
        ))
    }
}

fn database_error(e: sqlx::Error) -> OrderError {
    OrderError::DatabaseError(e.to_string())
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create_from_cart(&self, order: &Order, source: &Cart) -> Result<(), OrderError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let claimed = sqlx::query(
            r#"
            UPDATE carts
            SET version = version + 1, updated_at = NOW()
            WHERE account_id = $1 AND version = $2
            "#,
        )
        .bind(source.account_id.0)
        .bind(source.version)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await.map_err(database_error)?;
            tracing::warn!(
                account_id = %source.account_id,
                expected_version = source.version,
                "Cart changed during checkout"
            );
            return Err(OrderError::CartChanged);
        }

        sqlx::query("DELETE FROM cart_lines WHERE account_id = $1")
            .bind(source.account_id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, account_id, total_amount, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id().0)
        .bind(order.account_id().0)
        .bind(order.total_amount())
        .bind(order.status().as_str())
        .bind(order.created_at())
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        for (position, line) in order.lines().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, position, item_id, quantity, price_at_purchase)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id().0)
            .bind(position as i32)
            .bind(line.item_id.0)
            .bind(line.quantity.get())
            .bind(line.price_at_purchase)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        tx.commit().await.map_err(database_error)?;

        Ok(())
    }

    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Order>, OrderError> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, total_amount, status, created_at
            FROM orders
            WHERE account_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let ids = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("id"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(database_error)?;
        let mut lines = self.load_lines(&ids).await?;

        rows.iter()
            .map(|row| Self::row_to_order(row, &mut lines))
            .collect()
    }

    async fn find_for_account(
        &self,
        account_id: &AccountId,
        order_id: &OrderId,
    ) -> Result<Option<Order>, OrderError> {
        let row = sqlx::query(
            r#"
            SELECT id, account_id, total_amount, status, created_at
            FROM orders
            WHERE id = $1 AND account_id = $2
            "#,
        )
        .bind(order_id.0)
        .bind(account_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        match row {
            Some(row) => {
                let mut lines = self.load_lines(&[order_id.0]).await?;
                Self::row_to_order(&row, &mut lines).map(Some)
            }
            None => Ok(None),
        }
    }
}
