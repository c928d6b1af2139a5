//! API request handlers

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::routes::AppState;
use crate::error::Error;
use crate::types::{CreatedItem, Item};

pub const WELCOME_MESSAGE: &str = "Welcome to FastAPI GitOps Starter!";

// Query parameters

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateItemParams {
    /// Name of the new item
    pub name: String,
    /// Description of the new item
    pub description: String,
}

// Response types

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    /// Greeting
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            tracing::warn!("Rejected request: {}", self);
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            tracing::error!("Request failed: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let error = match self {
            Error::Validation(msg) => msg,
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// Handlers

/// Welcome message
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    ),
    tag = "root"
)]
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.into(),
    })
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".into(),
            service: state.service_name.to_string(),
        }),
    )
}

/// List example items
#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "List of items", body = ItemListResponse)
    ),
    tag = "items"
)]
pub async fn list_items() -> Json<ItemListResponse> {
    Json(ItemListResponse {
        items: Item::catalog(),
    })
}

/// Create an item (echoed back, not stored)
#[utoipa::path(
    post,
    path = "/api/items",
    params(CreateItemParams),
    responses(
        (status = 200, description = "Item created", body = CreatedItem),
        (status = 422, description = "Missing or invalid parameters", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    params: Result<Query<CreateItemParams>, QueryRejection>,
) -> Result<Json<CreatedItem>, Error> {
    let Query(params) = params?;
    tracing::debug!("Creating item {:?}", params.name);

    Ok(Json(CreatedItem::new(params.name, params.description)))
}

/// Get a single item by ID
#[utoipa::path(
    get,
    path = "/api/items/{item_id}",
    params(
        ("item_id" = i64, Path, description = "Item identifier")
    ),
    responses(
        (status = 200, description = "Item", body = Item),
        (status = 422, description = "Item ID is not an integer", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(item_id: Result<Path<i64>, PathRejection>) -> Result<Json<Item>, Error> {
    let Path(item_id) = item_id?;
    tracing::debug!("Fetching item {}", item_id);

    Ok(Json(Item::synthesize(item_id)))
}
