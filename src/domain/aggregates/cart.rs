//! Cart Aggregate
//!
//! The cart itself is owned by the cart service; checkout only ever reads a
//! snapshot of it and asks the store to reset it afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Per-user staging area for to-be-ordered items.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
    pub total_price: Decimal,
    pub total_items: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// The empty state a cart returns to after checkout.
    pub fn empty(user_id: Uuid) -> Self {
        let now = Utc::now();
        Cart {
            user_id,
            items: vec![],
            total_price: Decimal::ZERO,
            total_items: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Sum of quantities across all line entries.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
