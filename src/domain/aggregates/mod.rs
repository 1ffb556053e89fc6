//! Aggregates module
pub mod cart;
pub mod order;

pub use cart::{Cart, CartItem};
pub use order::{Order, OrderItem, OrderStatus, SnapshotError, TransitionError};
