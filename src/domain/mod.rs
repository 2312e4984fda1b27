//! Domain layer - pure payment-status logic with no I/O
//!
//! Contains webhook signature verification, the event model, status
//! projections with the no-regression rule, and the idempotent reconciler.

pub mod errors;
pub mod event;
pub mod projection;
pub mod reconciler;
pub mod status;
pub mod verifier;
