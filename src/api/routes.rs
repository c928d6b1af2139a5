//! API route definitions

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::server::Server;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, ErrorResponse, HealthResponse, ItemListResponse, WelcomeResponse};
use crate::config::Config;
use crate::error::Result;
use crate::types::{CreatedItem, Item};

/// Method and path of every API route, relative to the mount point
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/health"),
    ("GET", "/api/items"),
    ("POST", "/api/items"),
    ("GET", "/api/items/{item_id}"),
];

/// Documentation routes, served only at the top level
pub const DOC_PATHS: &[&str] = &["/docs", "/openapi.json", "/redoc"];

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FastAPI GitOps Starter",
        version = "1.0.0",
        description = "A starter template for learning GitOps with FastAPI"
    ),
    tags(
        (name = "root", description = "Welcome message"),
        (name = "items", description = "Example items"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::list_items,
        handlers::create_item,
        handlers::get_item,
    ),
    components(schemas(
        Item,
        CreatedItem,
        WelcomeResponse,
        HealthResponse,
        ItemListResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    /// OpenAPI document advertising the configured root path as its server
    pub fn for_config(config: &Config) -> utoipa::openapi::OpenApi {
        let mut openapi = Self::openapi();
        if let Some(prefix) = config.mount_prefix() {
            openapi.servers = Some(vec![Server::new(prefix)]);
        }
        openapi
    }

    /// Pretty-printed OpenAPI JSON for the given config
    pub fn to_json(config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::for_config(config))?)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            service_name: Arc::from(config.service_name.as_str()),
        }
    }
}

/// Every route mounted at `/` and, when configured, under the root path prefix
pub fn route_table(config: &Config) -> Vec<(&'static str, String)> {
    let mut table: Vec<(&'static str, String)> = ROUTES
        .iter()
        .map(|(method, path)| (*method, path.to_string()))
        .collect();

    if let Some(prefix) = config.mount_prefix() {
        table.extend(ROUTES.iter().map(|(method, path)| {
            let full = if *path == "/" {
                prefix.clone()
            } else {
                format!("{}{}", prefix, path)
            };
            (*method, full)
        }));
        table.push(("GET", format!("{}/", prefix)));
    }

    table
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))

        // Items
        .route("/api/items", get(handlers::list_items).post(handlers::create_item))
        .route("/api/items/{item_id}", get(handlers::get_item))
}

/// Create the API router.
///
/// Fails when the configured root path would overlap another route.
pub fn create_router(config: &Config) -> Result<Router> {
    config.validate()?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::for_config(config);

    let mut router = Router::new().merge(api_routes());

    // Reverse proxies that keep the prefix land here
    if let Some(prefix) = config.mount_prefix() {
        tracing::debug!("Mounting API under {}", prefix);
        router = router
            .nest(&prefix, api_routes())
            .route(&format!("{}/", prefix), get(handlers::root));
    }

    Ok(router
        // OpenAPI spec, Swagger UI and ReDoc
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi.clone()))
        .merge(Redoc::with_url("/redoc", openapi))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(config)))
}
