//! HTTP API layer

mod routes;
mod handlers;

pub use handlers::{CreateItemParams, ErrorResponse, HealthResponse, ItemListResponse, WelcomeResponse, WELCOME_MESSAGE};
pub use routes::{create_router, route_table, ApiDoc, AppState, DOC_PATHS, ROUTES};
