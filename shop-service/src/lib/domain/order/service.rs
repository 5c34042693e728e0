use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account::models::AccountId;
use crate::domain::cart::ports::CartRepository;
use crate::domain::catalog::ports::Catalog;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderId;
use crate::domain::order::ports::OrderRepository;
use crate::domain::order::ports::OrderServicePort;

/// Domain service converting carts into orders.
pub struct OrderService<OR, CR, C>
where
    OR: OrderRepository,
    CR: CartRepository,
    C: Catalog,
{
    orders: Arc<OR>,
    carts: Arc<CR>,
    catalog: Arc<C>,
}

impl<OR, CR, C> OrderService<OR, CR, C>
where
    OR: OrderRepository,
    CR: CartRepository,
    C: Catalog,
{
    /// Create a new order service with injected dependencies.
    ///
    /// # Arguments
    /// * `orders` - Order persistence, also responsible for emptying the source cart
    /// * `carts` - Cart persistence (read side)
    /// * `catalog` - Catalog providing prices at conversion time
    pub fn new(orders: Arc<OR>, carts: Arc<CR>, catalog: Arc<C>) -> Self {
        Self {
            orders,
            carts,
            catalog,
        }
    }
}

#[async_trait]
impl<OR, CR, C> OrderServicePort for OrderService<OR, CR, C>
where
    OR: OrderRepository,
    CR: CartRepository,
    C: Catalog,
{
    async fn place_order(&self, account_id: &AccountId) -> Result<Order, OrderError> {
        let cart = self
            .carts
            .find(account_id)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or(OrderError::EmptyCart)?;

        let prices: HashMap<_, _> = self
            .catalog
            .find_by_ids(&cart.item_ids())
            .await?
            .into_iter()
            .map(|item| (item.id, item.price))
            .collect();

        let order = Order::from_cart(&cart, &prices)?;
        self.orders.create_from_cart(&order, &cart).await?;

        tracing::info!(
            account_id = %account_id,
            order_id = %order.id(),
            line_count = order.lines().len(),
            total_amount = %order.total_amount(),
            "Order placed"
        );

        Ok(order)
    }

    async fn list_orders(&self, account_id: &AccountId) -> Result<Vec<Order>, OrderError> {
        self.orders.list_for_account(account_id).await
    }

    async fn get_order(
        &self,
        account_id: &AccountId,
        order_id: &OrderId,
    ) -> Result<Order, OrderError> {
        self.orders
            .find_for_account(account_id, order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }
}
