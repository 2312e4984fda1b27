//! Adapters - concrete implementations of the ports

pub mod store;
pub mod stripe;
