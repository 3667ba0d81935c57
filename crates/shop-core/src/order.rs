//! # Order Types
//!
//! Orders and their line items. Orders are owned by a user and own
//! their items; items reference products without owning them.

use crate::product::ProductWithCategory;
use crate::user::User;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting payment
    Created,
    /// Payment received
    Paid,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled before delivery
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Created
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    #[serde(default)]
    pub status: OrderStatus,

    pub total_amount: Decimal,

    pub shipping_address: String,

    pub created_at: DateTime<Utc>,
}

/// A stored line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,

    /// Owning order
    pub order_id: i64,

    /// Referenced product
    pub product_id: i64,

    /// Always greater than zero
    pub quantity: u32,

    /// Unit price at time of purchase, not the live product price
    pub price: Decimal,
}

impl OrderItem {
    /// Price times quantity
    pub fn total_price(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A line item about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: u32,
    pub price: Decimal,
}

impl NewOrderItem {
    pub fn new(product_id: i64, quantity: u32, price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            price,
        }
    }

    pub fn total_price(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order about to be stored. The store assigns ids and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn new(user_id: i64, shipping_address: impl Into<String>) -> Self {
        Self {
            user_id,
            status: OrderStatus::Created,
            shipping_address: shipping_address.into(),
            items: Vec::new(),
        }
    }

    /// Builder: set status
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder: add a line item
    pub fn with_item(mut self, product_id: i64, quantity: u32, price: Decimal) -> Self {
        self.items.push(NewOrderItem::new(product_id, quantity, price));
        self
    }

    /// Sum of line totals
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A line item joined with its product, as order listing reads it
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item: OrderItem,
    pub product: ProductWithCategory,
}

/// An order joined with its owner and lines
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWithItems {
    pub order: Order,
    pub user: User,
    pub lines: Vec<OrderLine>,
}
