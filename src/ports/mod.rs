//! Ports - trait boundaries between the domain and the outside world

pub mod payment_gateway;
pub mod projection_store;
