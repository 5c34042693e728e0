use async_trait::async_trait;

use crate::domain::account::models::AccountId;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::models::Cart;
use crate::domain::cart::models::CartView;
use crate::domain::cart::models::Quantity;
use crate::domain::catalog::models::ItemId;

/// Port for cart operations scoped to an authenticated account.
#[async_trait]
pub trait CartServicePort: Send + Sync + 'static {
    /// Current cart priced at live catalog prices.
    ///
    /// # Returns
    /// Cart view (empty view if the account has no cart yet)
    async fn get_cart(&self, account_id: &AccountId) -> Result<CartView, CartError>;

    /// Add an item, merging into an existing line.
    ///
    /// # Errors
    /// * `ItemNotFound` - Item is unknown to the catalog
    /// * `InvalidQuantity` - Merged quantity overflows
    async fn add_item(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
        quantity: Quantity,
    ) -> Result<CartView, CartError>;

    /// Overwrite a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    /// * `CartNotFound` - Account has no cart
    /// * `LineNotFound` - Item is not in the cart
    async fn set_quantity(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
        quantity: i64,
    ) -> Result<CartView, CartError>;

    /// Remove an item's line; absent lines are ignored.
    ///
    /// # Errors
    /// * `CartNotFound` - Account has no cart
    async fn remove_item(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
    ) -> Result<CartView, CartError>;

    /// Empty the cart; no-op if the account has none.
    async fn clear(&self, account_id: &AccountId) -> Result<(), CartError>;
}

/// Persistence operations for carts.
#[async_trait]
pub trait CartRepository: Send + Sync + 'static {
    /// Retrieve the account's cart.
    ///
    /// # Returns
    /// Optional cart (None if never created)
    async fn find(&self, account_id: &AccountId) -> Result<Option<Cart>, CartError>;

    /// Replace the stored cart with `cart`, creating it if needed.
    ///
    /// The write only lands if the stored version still equals
    /// `cart.version` (0 meaning no stored cart yet).
    ///
    /// # Returns
    /// The saved cart carrying its new version
    ///
    /// # Errors
    /// * `CartChanged` - Stored cart moved past the version that was read
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, cart: Cart) -> Result<Cart, CartError>;
}
