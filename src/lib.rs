//! Shopfront Orders
//!
//! Order service for a small self-hosted e-commerce backend: checkout turns
//! a user's cart into an immutable order snapshot, and the order status
//! state machine governs its lifecycle from there.
//!
//! ## Features
//! - Cart-to-order checkout, serialized per user
//! - Order status lifecycle (pending -> completed | cancelled)
//! - Bearer-token auth with per-resource ownership checks
//! - Postgres persistence with JSONB line-item documents
//! - Optional NATS publication of order events

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use service::OrderService;
