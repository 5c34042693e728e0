use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::account::models::AccountId;
use crate::domain::cart::models::Cart;
use crate::domain::cart::models::Quantity;
use crate::domain::catalog::models::ItemId;
use crate::domain::order::errors::OrderError;
use crate::domain::order::errors::OrderIdError;
use crate::domain::order::errors::OrderStatusError;

/// Order unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an order ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, OrderIdError> {
        Uuid::parse_str(s)
            .map(OrderId)
            .map_err(|e| OrderIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fulfillment progression. Orders start `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// The status that follows this one, `None` once delivered.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(OrderStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line with the price captured at conversion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: Quantity,
    pub price_at_purchase: Decimal,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.price_at_purchase * self.quantity.as_decimal()
    }
}

/// Placed order.
///
/// Lines and total are fixed at construction; only the status moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    account_id: AccountId,
    lines: Vec<OrderLine>,
    total_amount: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot a cart into a pending order.
    ///
    /// # Arguments
    /// * `cart` - Cart to convert, lines taken in cart order
    /// * `prices` - Current catalog price per item
    ///
    /// # Errors
    /// * `EmptyCart` - Cart has no lines
    /// * `ItemNotFound` - A line's item has no current price
    pub fn from_cart(cart: &Cart, prices: &HashMap<ItemId, Decimal>) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let lines = cart
            .lines()
            .iter()
            .map(|line| {
                prices
                    .get(&line.item_id)
                    .map(|price| OrderLine {
                        item_id: line.item_id,
                        quantity: line.quantity,
                        price_at_purchase: *price,
                    })
                    .ok_or(OrderError::ItemNotFound(line.item_id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total_amount = lines.iter().map(OrderLine::line_total).sum();

        Ok(Self {
            id: OrderId::new(),
            account_id: cart.account_id,
            lines,
            total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Rebuild an order from storage. The stored total is kept as-is.
    pub fn restore(
        id: OrderId,
        account_id: AccountId,
        lines: Vec<OrderLine>,
        total_amount: Decimal,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            lines,
            total_amount,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
