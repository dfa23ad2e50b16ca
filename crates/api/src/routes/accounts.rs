//! Account management routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::info;

use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath};
use crate::{AppState, middleware::AuthUser};
use coinkeeper_core::ledger::{Account, AccountUpdate, BalanceDrift, NewAccount};
use coinkeeper_shared::types::AccountId;

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/audit", get(audit_accounts))
        .route(
            "/accounts/{account_id}",
            get(get_account).patch(update_account).delete(delete_account),
        )
        .route("/accounts/{account_id}/recompute", post(recompute_account))
}

/// GET `/accounts` - List accounts with stored balances.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.ledger.list_accounts(auth.user_id()).await?))
}

/// POST `/accounts` - Open an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<NewAccount>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = state.ledger.create_account(auth.user_id(), payload).await?;
    info!(user_id = %auth.user_id(), account_id = %account.id, "Account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/{account_id}` - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(account_id): ApiPath<AccountId>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.ledger.get_account(auth.user_id(), account_id).await?))
}

/// PATCH `/accounts/{account_id}` - Rename or adjust an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(account_id): ApiPath<AccountId>,
    ApiJson(payload): ApiJson<AccountUpdate>,
) -> Result<Json<Account>, ApiError> {
    let account = state
        .ledger
        .update_account(auth.user_id(), account_id, payload)
        .await?;
    Ok(Json(account))
}

/// DELETE `/accounts/{account_id}` - Remove an account with no transactions.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(account_id): ApiPath<AccountId>,
) -> Result<StatusCode, ApiError> {
    state.ledger.delete_account(auth.user_id(), account_id).await?;
    info!(user_id = %auth.user_id(), account_id = %account_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/accounts/{account_id}/recompute` - Rebuild a balance from history.
async fn recompute_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(account_id): ApiPath<AccountId>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(
        state
            .ledger
            .recompute_account(auth.user_id(), account_id)
            .await?,
    ))
}

/// GET `/accounts/audit` - Report accounts whose stored balance drifted.
async fn audit_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<BalanceDrift>>, ApiError> {
    Ok(Json(state.ledger.audit_balances(auth.user_id()).await?))
}
