//! Category management routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};
use coinkeeper_core::ledger::{Category, CategoryUpdate, NewCategory, TransactionType};
use coinkeeper_shared::types::CategoryId;

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/quick", post(quick_create_category))
        .route(
            "/categories/{category_id}",
            patch(update_category).delete(delete_category),
        )
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Only categories of this type.
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
}

/// Request body for creating a category with defaults.
#[derive(Debug, Deserialize)]
pub struct QuickCategoryRequest {
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Display name.
    pub name: String,
}

/// GET `/categories` - List categories sorted by name.
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListCategoriesQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(
        state
            .ledger
            .list_categories(auth.user_id(), query.kind)
            .await?,
    ))
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.ledger.create_category(auth.user_id(), payload).await?;
    info!(user_id = %auth.user_id(), category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// POST `/categories/quick` - Create a category with default color and icon.
async fn quick_create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<QuickCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state
        .ledger
        .quick_create_category(auth.user_id(), payload.kind, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH `/categories/{category_id}` - Rename or restyle a category.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(category_id): ApiPath<CategoryId>,
    ApiJson(payload): ApiJson<CategoryUpdate>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(
        state
            .ledger
            .update_category(auth.user_id(), category_id, payload)
            .await?,
    ))
}

/// DELETE `/categories/{category_id}` - Remove an unused category.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<StatusCode, ApiError> {
    state
        .ledger
        .delete_category(auth.user_id(), category_id)
        .await?;
    info!(user_id = %auth.user_id(), category_id = %category_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
