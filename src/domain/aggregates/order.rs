//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::cart::Cart;

/// Lifecycle status of an order.
///
/// `Pending` is the only state that accepts transitions; `Completed` and
/// `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Parses the wire form. Anything outside the three known values is an
    /// error carrying the allowed set, for the client's benefit.
    pub fn parse(value: &str) -> Result<Self, InvalidStatus> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(InvalidStatus),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("status can only be ['pending', 'completed', 'cancelled']")]
pub struct InvalidStatus;

/// A line entry frozen from the cart at checkout time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// An immutable-content purchase record with a mutable status.
///
/// Everything except `status` and `updated_at` is frozen at creation; there
/// is no line-item mutation API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub total_items: i32,
    pub total_quantity: i64,
    pub cancellable: bool,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a status change request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Requested the status the order already has.
    #[error("order is already {0}")]
    NoOp(OrderStatus),

    /// The order left `pending` at some point; nothing moves it again.
    #[error("order status can no longer be changed")]
    Terminal,

    /// `pending -> cancelled` on an order created with `cancellable = false`.
    #[error("order is not cancellable")]
    NotCancellable,
}

/// Why a cart could not be snapshotted into an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("cart has no items")]
    EmptyCart,

    /// `total_items` claims content but the item list is empty.
    #[error("cart totals disagree with its line items")]
    InconsistentCart,
}

impl Order {
    /// Freezes a non-empty cart into a new `pending` order.
    ///
    /// Copies `items`, `total_price` and `total_items` verbatim and computes
    /// `total_quantity` as the sum of line quantities.
    pub fn from_cart(user_id: Uuid, cart: &Cart, cancellable: bool) -> Result<Self, SnapshotError> {
        if cart.total_items == 0 {
            return Err(SnapshotError::EmptyCart);
        }
        if cart.items.is_empty() {
            return Err(SnapshotError::InconsistentCart);
        }

        let now = Utc::now();
        Ok(Order {
            id: Uuid::now_v7(),
            user_id,
            items: cart
                .items
                .iter()
                .map(|i| OrderItem { product_id: i.product_id, quantity: i.quantity })
                .collect(),
            total_price: cart.total_price,
            total_items: cart.total_items,
            total_quantity: cart.total_quantity(),
            cancellable,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Decides whether the order may move to `requested`.
    ///
    /// The full rule, keyed on `(cancellable, status, requested)`:
    /// - any terminal order refuses every request, including its own status;
    /// - `pending -> pending` is refused, never a no-op success;
    /// - `pending -> completed` is always allowed;
    /// - `pending -> cancelled` is allowed only while `cancellable` is set.
    pub fn validate_transition(&self, requested: OrderStatus) -> Result<OrderStatus, TransitionError> {
        match (self.status, requested) {
            (OrderStatus::Pending, OrderStatus::Pending) => {
                Err(TransitionError::NoOp(OrderStatus::Pending))
            }
            (OrderStatus::Pending, OrderStatus::Completed) => Ok(OrderStatus::Completed),
            (OrderStatus::Pending, OrderStatus::Cancelled) if self.cancellable => {
                Ok(OrderStatus::Cancelled)
            }
            (OrderStatus::Pending, OrderStatus::Cancelled) => Err(TransitionError::NotCancellable),
            _ => Err(TransitionError::Terminal),
        }
    }
}
