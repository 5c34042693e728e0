use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::account::models::AccountId;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::errors::QuantityError;
use crate::domain::catalog::models::CatalogItem;
use crate::domain::catalog::models::ItemId;

/// Positive line quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    /// Validate a requested quantity.
    ///
    /// # Errors
    /// * `NotPositive` - Zero or negative
    /// * `TooLarge` - Does not fit the stored integer range
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }

        i32::try_from(value)
            .map(Quantity)
            .map_err(|_| QuantityError::TooLarge {
                max: i64::from(i32::MAX),
                actual: value,
            })
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    /// Sum of two quantities, as used by the merge-on-add rule.
    pub fn checked_add(self, other: Quantity) -> Result<Quantity, QuantityError> {
        Quantity::new(i64::from(self.0) + i64::from(other.0))
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

/// One distinct item in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item_id: ItemId,
    pub quantity: Quantity,
}

/// Mutable per-account cart.
///
/// Holds at most one line per item; lines keep insertion order. `version`
/// is the storage revision this value was read at (0 for a cart that has
/// never been saved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub account_id: AccountId,
    lines: Vec<CartLine>,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(account_id: AccountId) -> Self {
        Self {
            account_id,
            lines: Vec::new(),
            version: 0,
            updated_at: Utc::now(),
        }
    }

    /// Rebuild a cart from storage.
    ///
    /// Lines for a repeated item are merged so the one-line-per-item rule
    /// holds even for inconsistent rows.
    pub fn restore(
        account_id: AccountId,
        lines: Vec<CartLine>,
        version: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, QuantityError> {
        let mut cart = Self {
            account_id,
            lines: Vec::with_capacity(lines.len()),
            version,
            updated_at,
        };
        for line in lines {
            cart.merge(line.item_id, line.quantity)?;
        }

        Ok(cart)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == *item_id)
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.lines.iter().map(|line| line.item_id).collect()
    }

    /// Add `quantity` of an item, incrementing an existing line.
    ///
    /// # Errors
    /// * `TooLarge` - Merged quantity overflows
    pub fn add(&mut self, item_id: ItemId, quantity: Quantity) -> Result<(), QuantityError> {
        self.merge(item_id, quantity)?;
        self.touch();
        Ok(())
    }

    /// Overwrite a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    /// * `LineNotFound` - Item is not in the cart
    /// * `InvalidQuantity` - Quantity too large
    pub fn set_quantity(&mut self, item_id: &ItemId, requested: i64) -> Result<(), CartError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.item_id == *item_id)
            .ok_or(CartError::LineNotFound(*item_id))?;

        if requested <= 0 {
            self.lines.remove(position);
        } else {
            self.lines[position].quantity = Quantity::new(requested)?;
        }
        self.touch();

        Ok(())
    }

    /// Remove an item's line.
    ///
    /// # Returns
    /// Whether a line was removed
    pub fn remove(&mut self, item_id: &ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.item_id != *item_id);
        self.touch();
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.touch();
    }

    fn merge(&mut self, item_id: ItemId, quantity: Quantity) -> Result<(), QuantityError> {
        match self.lines.iter_mut().find(|line| line.item_id == item_id) {
            Some(line) => line.quantity = line.quantity.checked_add(quantity)?,
            None => self.lines.push(CartLine { item_id, quantity }),
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Cart line resolved against the live catalog, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CartViewLine {
    pub item: CatalogItem,
    pub quantity: Quantity,
    pub line_total: Decimal,
}

/// Cart priced at current catalog prices. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub lines: Vec<CartViewLine>,
    pub total: Decimal,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    /// Price each cart line with the given catalog entries.
    ///
    /// Lines whose item is no longer in the catalog are left out.
    pub fn resolve(cart: &Cart, items: &[CatalogItem]) -> Self {
        let by_id: HashMap<ItemId, &CatalogItem> =
            items.iter().map(|item| (item.id, item)).collect();

        let lines: Vec<CartViewLine> = cart
            .lines()
            .iter()
            .filter_map(|line| {
                by_id.get(&line.item_id).map(|item| CartViewLine {
                    item: (*item).clone(),
                    quantity: line.quantity,
                    line_total: item.price * line.quantity.as_decimal(),
                })
            })
            .collect();
        let total = lines.iter().map(|line| line.line_total).sum();

        Self { lines, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(num: i64, scale: u32) -> Decimal {
        Decimal::new(num, scale)
    }

    fn qty(value: i64) -> Quantity {
        Quantity::new(value).unwrap()
    }

    fn item(id: ItemId, price: Decimal) -> CatalogItem {
        CatalogItem {
            id,
            name: "Coffee Maker".to_string(),
            price,
            stock: 100,
        }
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-3), Err(QuantityError::NotPositive(-3)));
        assert!(matches!(
            Quantity::new(i64::from(i32::MAX) + 1),
            Err(QuantityError::TooLarge { .. })
        ));
        assert_eq!(Quantity::new(2).unwrap().get(), 2);
    }

    #[test]
    fn test_add_merges_same_item() {
        let mut cart = Cart::empty(AccountId::new());
        let item_id = ItemId::new();

        cart.add(item_id, qty(2)).unwrap();
        cart.add(item_id, qty(3)).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&item_id).unwrap().quantity, qty(5));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::empty(AccountId::new());
        let first = ItemId::new();
        let second = ItemId::new();

        cart.add(first, qty(1)).unwrap();
        cart.add(second, qty(1)).unwrap();
        cart.add(first, qty(1)).unwrap();

        assert_eq!(cart.item_ids(), vec![first, second]);
    }

    #[test]
    fn test_add_overflow_leaves_line_untouched() {
        let mut cart = Cart::empty(AccountId::new());
        let item_id = ItemId::new();
        cart.add(item_id, qty(i64::from(i32::MAX))).unwrap();

        assert!(cart.add(item_id, qty(1)).is_err());
        assert_eq!(cart.line(&item_id).unwrap().quantity.get(), i32::MAX);
    }

    #[test]
    fn test_set_quantity_overwrites_and_deletes_by_zero() {
        let mut cart = Cart::empty(AccountId::new());
        let item_id = ItemId::new();
        cart.add(item_id, qty(2)).unwrap();

        cart.set_quantity(&item_id, 7).unwrap();
        assert_eq!(cart.line(&item_id).unwrap().quantity, qty(7));

        cart.set_quantity(&item_id, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut cart = Cart::empty(AccountId::new());

        let result = cart.set_quantity(&ItemId::new(), 1);
        assert!(matches!(result, Err(CartError::LineNotFound(_))));
    }

    #[test]
    fn test_remove_absent_line_is_noop() {
        let mut cart = Cart::empty(AccountId::new());
        let item_id = ItemId::new();
        cart.add(item_id, qty(1)).unwrap();

        assert!(!cart.remove(&ItemId::new()));
        assert!(cart.remove(&item_id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_merges_duplicate_rows() {
        let item_id = ItemId::new();
        let lines = vec![
            CartLine {
                item_id,
                quantity: qty(1),
            },
            CartLine {
                item_id,
                quantity: qty(2),
            },
        ];

        let cart = Cart::restore(AccountId::new(), lines, 4, Utc::now()).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&item_id).unwrap().quantity, qty(3));
        assert_eq!(cart.version, 4);
    }

    #[test]
    fn test_view_uses_live_prices() {
        let mut cart = Cart::empty(AccountId::new());
        let x = ItemId::new();
        let y = ItemId::new();
        cart.add(x, qty(2)).unwrap();
        cart.add(y, qty(1)).unwrap();

        let view = CartView::resolve(&cart, &[item(x, dec(1000, 2)), item(y, dec(450, 2))]);

        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].line_total, dec(2000, 2));
        assert_eq!(view.total, dec(2450, 2));
    }

    #[test]
    fn test_view_skips_items_gone_from_catalog() {
        let mut cart = Cart::empty(AccountId::new());
        let x = ItemId::new();
        cart.add(x, qty(2)).unwrap();
        cart.add(ItemId::new(), qty(1)).unwrap();

        let view = CartView::resolve(&cart, &[item(x, dec(1000, 2))]);

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.total, dec(2000, 2));
    }
}
