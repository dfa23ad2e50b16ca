//! Transaction routes.
//!
//! Every mutation goes through the ledger service, which keeps account
//! balances in step with the transaction history.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use tracing::info;

use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};
use coinkeeper_core::ledger::{EnrichedTransaction, TransactionFilter, TransactionInput};
use coinkeeper_shared::types::TransactionId;

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// GET `/transactions` - List transactions newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(filter): ApiQuery<TransactionFilter>,
) -> Result<Json<Vec<EnrichedTransaction>>, ApiError> {
    Ok(Json(
        state
            .ledger
            .list_transactions(auth.user_id(), &filter)
            .await?,
    ))
}

/// GET `/transactions/{transaction_id}` - Fetch one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Json<EnrichedTransaction>, ApiError> {
    Ok(Json(
        state
            .ledger
            .get_transaction(auth.user_id(), transaction_id)
            .await?,
    ))
}

/// POST `/transactions` - Record a transaction and move its account balance.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<TransactionInput>,
) -> Result<(StatusCode, Json<EnrichedTransaction>), ApiError> {
    let user_id = auth.user_id();
    let transaction = state.ledger.create_transaction(user_id, payload).await?;
    info!(%user_id, transaction_id = %transaction.id, "Transaction created");

    let enriched = state.ledger.describe_transaction(user_id, transaction).await;
    Ok((StatusCode::CREATED, Json(enriched)))
}

/// PUT `/transactions/{transaction_id}` - Replace a transaction's fields.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(payload): ApiJson<TransactionInput>,
) -> Result<Json<EnrichedTransaction>, ApiError> {
    let user_id = auth.user_id();
    let transaction = state
        .ledger
        .update_transaction(user_id, transaction_id, payload)
        .await?;
    Ok(Json(state.ledger.describe_transaction(user_id, transaction).await))
}

/// DELETE `/transactions/{transaction_id}` - Remove a transaction and undo its effect.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<StatusCode, ApiError> {
    let user_id = auth.user_id();
    state
        .ledger
        .delete_transaction(user_id, transaction_id)
        .await?;
    info!(%user_id, transaction_id = %transaction_id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}
