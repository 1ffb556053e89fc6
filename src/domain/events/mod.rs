//! Domain events
//!
//! Emitted after a successful order mutation and published to the event bus
//! when one is configured. Consumers (notifications, analytics) subscribe by
//! subject.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::order::OrderStatus;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Created { order_id: Uuid, user_id: Uuid, total_price: Decimal },
    StatusChanged { order_id: Uuid, user_id: Uuid, status: OrderStatus },
}

impl OrderEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            OrderEvent::Created { .. } => "orders.created",
            OrderEvent::StatusChanged { .. } => "orders.status_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_subjects() {
        let created = OrderEvent::Created {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            total_price: Decimal::ZERO,
        };
        assert_eq!(created.subject(), "orders.created");

        let changed = OrderEvent::StatusChanged {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: OrderStatus::Completed,
        };
        assert_eq!(changed.subject(), "orders.status_changed");
    }

    #[test]
    fn test_event_payload_is_tagged() {
        let event = OrderEvent::StatusChanged {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: OrderStatus::Cancelled,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["status"], "cancelled");
    }
}
