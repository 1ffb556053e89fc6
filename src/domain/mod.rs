//! Domain model: aggregates and the events they raise. No I/O here.
pub mod aggregates;
pub mod events;
