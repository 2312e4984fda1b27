//! Payment Relay - Stripe integration boundary
//!
//! This crate relays checkout and subscription operations to Stripe and
//! receives its asynchronous payment-status webhooks, applying idempotent
//! status reconciliation over an at-least-once delivery channel.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod ports;
