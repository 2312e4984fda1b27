//! Application layer - use-case handlers wiring domain logic to ports

pub mod confirm_subscription;
pub mod create_payment_session;
pub mod handle_webhook;
