//! Order workflow: checkout (cart-to-order) and status transitions.
//!
//! All collaborators are injected at construction; the service owns nothing
//! but the per-user checkout locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::aggregates::order::{Order, OrderStatus, SnapshotError, TransitionError};
use crate::domain::events::OrderEvent;
use crate::error::{Error, Result};
use crate::store::{CartStore, OrderStore, UserDirectory};

/// Orders stay cancellable unless the caller opts out at checkout.
const DEFAULT_CANCELLABLE: bool = true;

pub struct OrderService {
    users: Arc<dyn UserDirectory>,
    carts: Arc<dyn CartStore>,
    orders: Arc<dyn OrderStore>,
    events: Option<async_nats::Client>,
    /// One lock per user, held across the whole load-cart/insert/reset
    /// sequence so two concurrent checkouts cannot both spend one cart.
    checkout_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl OrderService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        carts: Arc<dyn CartStore>,
        orders: Arc<dyn OrderStore>,
        events: Option<async_nats::Client>,
    ) -> Self {
        OrderService {
            users,
            carts,
            orders,
            events,
            checkout_locks: DashMap::new(),
        }
    }

    /// Path user must exist and must be the authenticated caller.
    async fn authorize(&self, caller: Uuid, user_id: Uuid) -> Result<()> {
        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or(Error::NotFound("user"))?;
        if user.id != caller {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn checkout_lock(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        let entry = self.checkout_locks.entry(user_id).or_default();
        entry.value().clone()
    }

    /// Consumes the user's cart into a new `pending` order and resets the
    /// cart to empty. The two writes form one logical unit: a failed reset
    /// unwinds the insert so the cart can never be spent twice.
    pub async fn create_order(
        &self,
        caller: Uuid,
        user_id: Uuid,
        cancellable: Option<bool>,
    ) -> Result<Order> {
        self.authorize(caller, user_id).await?;

        let lock = self.checkout_lock(user_id);
        let _guard = lock.lock().await;

        let cart = self
            .carts
            .cart_for_user(user_id)
            .await?
            .ok_or(Error::NotFound("cart"))?;

        let order = Order::from_cart(user_id, &cart, cancellable.unwrap_or(DEFAULT_CANCELLABLE))
            .map_err(|e| match e {
                SnapshotError::EmptyCart => Error::EmptyCart,
                SnapshotError::InconsistentCart => Error::Internal(e.to_string()),
            })?;

        self.orders.insert(&order).await?;

        if let Err(reset_err) = self.carts.reset_cart(user_id).await {
            match self.orders.delete(order.id).await {
                Ok(()) => {
                    warn!(order_id = %order.id, %reset_err, "cart reset failed, checkout rolled back")
                }
                Err(delete_err) => {
                    error!(order_id = %order.id, %reset_err, %delete_err, "cart reset and rollback both failed")
                }
            }
            return Err(reset_err.into());
        }

        info!(
            order_id = %order.id,
            user_id = %user_id,
            total_quantity = order.total_quantity,
            "order created"
        );
        self.publish(OrderEvent::Created {
            order_id: order.id,
            user_id,
            total_price: order.total_price,
        })
        .await;

        Ok(order)
    }

    /// Applies one status transition, if the state machine permits it.
    ///
    /// The write is conditional on the status the decision was made against,
    /// so two racing requests cannot both succeed from the same `pending`.
    pub async fn update_order_status(
        &self,
        caller: Uuid,
        user_id: Uuid,
        order_id: Uuid,
        requested: OrderStatus,
    ) -> Result<Order> {
        self.authorize(caller, user_id).await?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(Error::NotFound("order"))?;
        if order.user_id != user_id {
            return Err(Error::Unauthorized);
        }

        let next = order.validate_transition(requested)?;

        match self.orders.update_status(order_id, order.status, next).await? {
            Some(updated) => {
                info!(order_id = %order_id, status = %next, "order status changed");
                self.publish(OrderEvent::StatusChanged {
                    order_id,
                    user_id,
                    status: next,
                })
                .await;
                Ok(updated)
            }
            // A concurrent transition moved the order out of `pending` first.
            None => Err(TransitionError::Terminal.into()),
        }
    }

    pub async fn get_order(&self, caller: Uuid, user_id: Uuid, order_id: Uuid) -> Result<Order> {
        self.authorize(caller, user_id).await?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(Error::NotFound("order"))?;
        if order.user_id != user_id {
            return Err(Error::Unauthorized);
        }
        Ok(order)
    }

    pub async fn list_orders(
        &self,
        caller: Uuid,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>> {
        self.authorize(caller, user_id).await?;
        Ok(self.orders.list_for_user(user_id, limit, offset).await?)
    }

    /// Best-effort event publication; a bus failure never fails the request.
    async fn publish(&self, event: OrderEvent) {
        let Some(client) = &self.events else { return };
        match serde_json::to_vec(&event) {
            Ok(payload) => {
                if let Err(err) = client.publish(event.subject().to_string(), payload.into()).await
                {
                    warn!(%err, subject = event.subject(), "failed to publish order event");
                }
            }
            Err(err) => warn!(%err, "failed to serialize order event"),
        }
    }
}
