//! Storage interfaces for the order component's collaborators.
//!
//! The order service depends on these traits, never on a concrete pool, so
//! the Postgres implementations in [`postgres`] can be swapped for in-memory
//! fakes in tests.

pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::cart::Cart;
use crate::domain::aggregates::order::{Order, OrderStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} row not found")]
    MissingRow(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Directory record for an account; only what existence and ownership checks
/// need. Accounts themselves are managed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn cart_for_user(&self, user_id: Uuid) -> StoreResult<Option<Cart>>;

    /// Empties the cart: no items, zero totals. The only cart mutation the
    /// order component ever performs.
    async fn reset_cart(&self, user_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>>;

    async fn list_for_user(&self, user_id: Uuid, limit: i64, offset: i64)
        -> StoreResult<Vec<Order>>;

    /// Conditional write: succeeds only while the row still holds `expected`.
    /// Returns the updated order, or `None` when the condition no longer
    /// holds (a concurrent transition won).
    async fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> StoreResult<Option<Order>>;

    /// Removes an order row. Only used to unwind a checkout whose cart reset
    /// failed; a successfully created order is never deleted.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}
