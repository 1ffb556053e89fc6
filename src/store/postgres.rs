//! Postgres-backed stores.
//!
//! Line items are stored as JSONB documents on their owning row, so a cart
//! or order reads and writes as one unit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{CartStore, OrderStore, StoreError, StoreResult, User, UserDirectory};
use crate::domain::aggregates::cart::{Cart, CartItem};
use crate::domain::aggregates::order::{Order, OrderItem, OrderStatus};

#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        PgUserDirectory { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    user_id: Uuid,
    items: Json<Vec<CartItem>>,
    total_price: Decimal,
    total_items: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Cart {
            user_id: row.user_id,
            items: row.items.0,
            total_price: row.total_price,
            total_items: row.total_items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        PgCartStore { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn cart_for_user(&self, user_id: Uuid) -> StoreResult<Option<Cart>> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT user_id, items, total_price, total_items, created_at, updated_at \
             FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Cart::from))
    }

    async fn reset_cart(&self, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE carts SET items = '[]'::jsonb, total_price = 0, total_items = 0, \
             updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::MissingRow("cart"));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    items: Json<Vec<OrderItem>>,
    total_price: Decimal,
    total_items: i32,
    total_quantity: i64,
    cancellable: bool,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            total_price: row.total_price,
            total_items: row.total_items,
            total_quantity: row.total_quantity,
            cancellable: row.cancellable,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, items, total_price, total_items, total_quantity, \
                             cancellable, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        PgOrderStore { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn insert(&self, order: &Order) -> StoreResult<()> {
        debug!(id = %order.id, user_id = %order.user_id, "inserting order");

        sqlx::query(
            "INSERT INTO orders (id, user_id, items, total_price, total_items, total_quantity, \
             cancellable, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(Json(&order.items))
        .bind(order.total_price)
        .bind(order.total_items)
        .bind(order.total_quantity)
        .bind(order.cancellable)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Order::from))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(expected)
        .bind(new_status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Order::from))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
