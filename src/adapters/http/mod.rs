//! HTTP adapter - Router, shared state and the health endpoint.

pub mod health;
pub mod routes;
mod state;

pub use health::{health, HealthResponse};
pub use routes::app_router;
pub use state::HubState;
