use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::models::Cart;
use crate::domain::cart::ports::CartRepository;
use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::models::CatalogItem;
use crate::domain::catalog::models::ItemId;
use crate::domain::catalog::ports::Catalog;
use crate::domain::order::errors::OrderError;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderId;
use crate::domain::order::ports::OrderRepository;

#[derive(Debug, Default)]
struct StoreState {
    accounts: HashMap<AccountId, Account>,
    usernames: HashMap<String, AccountId>,
    carts: HashMap<AccountId, Cart>,
    /// Insertion order
    orders: Vec<Order>,
    items: HashMap<ItemId, CatalogItem>,
}

/// Process-local storage implementing every persistence port.
///
/// All state sits behind one lock, so the conditional writes (session
/// claim, checkout) are atomic. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with catalog entries.
    pub fn with_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let state = StoreState {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
            ..StoreState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Change the live price of a catalog entry.
    ///
    /// # Returns
    /// Whether the item exists
    pub async fn set_price(&self, id: &ItemId, price: Decimal) -> bool {
        match self.state.write().await.items.get_mut(id) {
            Some(item) => {
                item.price = price;
                true
            }
            None => false,
        }
    }

    /// Remove a catalog entry.
    pub async fn remove_item(&self, id: &ItemId) -> Option<CatalogItem> {
        self.state.write().await.items.remove(id)
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut state = self.state.write().await;
        if state.usernames.contains_key(account.username.as_str()) {
            return Err(AccountError::DuplicateIdentity(account.username.to_string()));
        }

        state
            .usernames
            .insert(account.username.as_str().to_string(), account.id);
        state.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.state.read().await.accounts.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountError> {
        let state = self.state.read().await;
        Ok(state
            .usernames
            .get(username.as_str())
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn claim_session(&self, id: &AccountId, token: &str) -> Result<bool, AccountError> {
        let mut state = self.state.write().await;
        match state.accounts.get_mut(id) {
            Some(account) if account.active_session_token.is_none() => {
                account.active_session_token = Some(token.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn replace_session(
        &self,
        id: &AccountId,
        stale: &str,
        token: &str,
    ) -> Result<bool, AccountError> {
        let mut state = self.state.write().await;
        match state.accounts.get_mut(id) {
            Some(account) if account.holds_session(stale) => {
                account.active_session_token = Some(token.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_session(&self, id: &AccountId, token: &str) -> Result<(), AccountError> {
        let mut state = self.state.write().await;
        if let Some(account) = state.accounts.get_mut(id).filter(|a| a.holds_session(token)) {
            account.active_session_token = None;
        }
        Ok(())
    }
}

#[async_trait]
impl CartRepository for InMemoryStore {
    async fn find(&self, account_id: &AccountId) -> Result<Option<Cart>, CartError> {
        Ok(self.state.read().await.carts.get(account_id).cloned())
    }

    async fn save(&self, mut cart: Cart) -> Result<Cart, CartError> {
        let mut state = self.state.write().await;
        let current = state
            .carts
            .get(&cart.account_id)
            .map(|stored| stored.version)
            .unwrap_or(0);
        if current != cart.version {
            tracing::warn!(
                account_id = %cart.account_id,
                expected_version = cart.version,
                stored_version = current,
                "Cart changed before save"
            );
            return Err(CartError::CartChanged);
        }

        cart.version = current + 1;
        state.carts.insert(cart.account_id, cart.clone());

        Ok(cart)
    }
}

#[async_trait]
impl Catalog for InMemoryStore {
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<CatalogItem>, CatalogError> {
        Ok(self.state.read().await.items.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.items.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create_from_cart(&self, order: &Order, source: &Cart) -> Result<(), OrderError> {
        let mut state = self.state.write().await;

        let Some(cart) = state
            .carts
            .get_mut(&source.account_id)
            .filter(|cart| cart.version == source.version)
        else {
            tracing::warn!(
                account_id = %source.account_id,
                expected_version = source.version,
                "Cart changed during checkout"
            );
            return Err(OrderError::CartChanged);
        };

        cart.clear();
        cart.version += 1;
        state.orders.push(order.clone());

        Ok(())
    }

    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<Order>, OrderError> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .rev()
            .filter(|order| order.account_id() == *account_id)
            .cloned()
            .collect();
        // Stable, so equal timestamps keep newest-inserted first.
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(orders)
    }

    async fn find_for_account(
        &self,
        account_id: &AccountId,
        order_id: &OrderId,
    ) -> Result<Option<Order>, OrderError> {
        Ok(self
            .state
            .read()
            .await
            .orders
            .iter()
            .find(|order| order.id() == *order_id && order.account_id() == *account_id)
            .cloned())
    }
}
