use async_trait::async_trait;

use crate::domain::account::models::AccountId;
use crate::domain::cart::models::Cart;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderId;

/// Port for order placement and history.
#[async_trait]
pub trait OrderServicePort: Send + Sync + 'static {
    /// Convert the account's cart into a pending order and empty the cart.
    ///
    /// # Errors
    /// * `EmptyCart` - No cart or no lines
    /// * `ItemNotFound` - A cart line's item left the catalog
    /// * `CartChanged` - Cart was modified while converting; nothing was written
    /// * `DatabaseError` - Database operation failed
    async fn place_order(&self, account_id: &AccountId) -> Result<Order, OrderError>;

    /// All orders of the account, most recent first.
    async fn list_orders(&self, account_id: &AccountId) -> Result<Vec<Order>, OrderError>;

    /// One order, only if it belongs to the account.
    ///
    /// # Errors
    /// * `OrderNotFound` - No such order for this account
    async fn get_order(
        &self,
        account_id: &AccountId,
        order_id: &OrderId,
    ) -> Result<Order, OrderError>;
}

/// Persistence operations for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// Store `order` and empty the cart it was built from, as one unit.
    ///
    /// The cart is emptied only if its stored version still equals
    /// `source.version`; otherwise nothing is written.
    ///
    /// # Errors
    /// * `CartChanged` - Stored cart no longer matches `source`
    /// * `DatabaseError` - Database operation failed
    async fn create_from_cart(&self, order: &Order, source: &Cart) -> Result<(), OrderError>;

    /// Orders owned by the account, newest first.
    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Order>, OrderError>;

    /// Order by id, restricted to the owning account.
    ///
    /// # Returns
    /// Optional order (None if missing or owned by someone else)
    async fn find_for_account(
        &self,
        account_id: &AccountId,
        order_id: &OrderId,
    ) -> Result<Option<Order>, OrderError>;
}
