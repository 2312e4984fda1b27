mod client;
mod types;

pub use client::{StripeConfig, StripeGateway};
