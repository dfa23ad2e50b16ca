//! HTTP surface of the ledger, mounted under `/api/v1`.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod auth;
pub mod categories;
pub mod health;
pub mod stats;
pub mod transactions;

/// Health and auth are open; everything that touches a user's ledger sits behind the bearer guard.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let ledger = Router::new()
        .merge(accounts::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
        .merge(stats::routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(ledger)
}
