use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account::models::AccountId;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::models::Cart;
use crate::domain::cart::models::CartView;
use crate::domain::cart::models::Quantity;
use crate::domain::cart::ports::CartRepository;
use crate::domain::cart::ports::CartServicePort;
use crate::domain::catalog::models::ItemId;
use crate::domain::catalog::ports::Catalog;

/// Domain service for the per-account cart.
pub struct CartService<CR, C>
where
    CR: CartRepository,
    C: Catalog,
{
    repository: Arc<CR>,
    catalog: Arc<C>,
}

impl<CR, C> CartService<CR, C>
where
    CR: CartRepository,
    C: Catalog,
{
    /// Create a new cart service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Cart persistence implementation
    /// * `catalog` - Catalog used for existence checks and display prices
    pub fn new(repository: Arc<CR>, catalog: Arc<C>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    async fn view(&self, cart: &Cart) -> Result<CartView, CartError> {
        if cart.is_empty() {
            return Ok(CartView::empty());
        }

        let items = self.catalog.find_by_ids(&cart.item_ids()).await?;
        let view = CartView::resolve(cart, &items);
        if view.lines.len() != cart.lines().len() {
            tracing::warn!(
                account_id = %cart.account_id,
                missing = cart.lines().len() - view.lines.len(),
                "Cart references items no longer in the catalog"
            );
        }

        Ok(view)
    }

    async fn existing_cart(&self, account_id: &AccountId) -> Result<Cart, CartError> {
        self.repository
            .find(account_id)
            .await?
            .ok_or(CartError::CartNotFound)
    }
}

#[async_trait]
impl<CR, C> CartServicePort for CartService<CR, C>
where
    CR: CartRepository,
    C: Catalog,
{
    async fn get_cart(&self, account_id: &AccountId) -> Result<CartView, CartError> {
        match self.repository.find(account_id).await? {
            Some(cart) => self.view(&cart).await,
            None => Ok(CartView::empty()),
        }
    }

    async fn add_item(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
        quantity: Quantity,
    ) -> Result<CartView, CartError> {
        if self.catalog.find_by_id(item_id).await?.is_none() {
            return Err(CartError::ItemNotFound(*item_id));
        }

        let mut cart = self
            .repository
            .find(account_id)
            .await?
            .unwrap_or_else(|| Cart::empty(*account_id));
        cart.add(*item_id, quantity)?;

        let saved = self.repository.save(cart).await?;
        tracing::debug!(
            account_id = %account_id,
            item_id = %item_id,
            quantity = quantity.get(),
            "Item added to cart"
        );

        self.view(&saved).await
    }

    async fn set_quantity(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
        quantity: i64,
    ) -> Result<CartView, CartError> {
        let mut cart = self.existing_cart(account_id).await?;
        cart.set_quantity(item_id, quantity)?;

        let saved = self.repository.save(cart).await?;
        self.view(&saved).await
    }

    async fn remove_item(
        &self,
        account_id: &AccountId,
        item_id: &ItemId,
    ) -> Result<CartView, CartError> {
        let mut cart = self.existing_cart(account_id).await?;
        if !cart.remove(item_id) {
            return self.view(&cart).await;
        }

        let saved = self.repository.save(cart).await?;
        self.view(&saved).await
    }

    async fn clear(&self, account_id: &AccountId) -> Result<(), CartError> {
        let Some(mut cart) = self.repository.find(account_id).await? else {
            return Ok(());
        };
        if cart.is_empty() {
            return Ok(());
        }

        cart.clear();
        self.repository.save(cart).await?;
        tracing::debug!(account_id = %account_id, "Cart cleared");

        Ok(())
    }
}
