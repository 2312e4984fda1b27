//! HTTP layer - axum routes, handlers, and wire DTOs

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::build_router;
