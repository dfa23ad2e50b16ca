//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Bearer token authentication middleware
//! - Request extractors that report rejections in the API error format
//! - Mapping from domain errors to HTTP responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod testing;

use std::iter::once;
use std::sync::Arc;

use axum::Router;
use axum::http::header::AUTHORIZATION;
use coinkeeper_core::auth::UserService;
use coinkeeper_core::ledger::LedgerService;
use coinkeeper_db::JsonLedgerStore;
use coinkeeper_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Accounts, categories, transactions, and statistics.
    pub ledger: Arc<LedgerService<JsonLedgerStore>>,
    /// Registration and login.
    pub users: Arc<UserService<JsonLedgerStore>>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Display currency echoed on the dashboard.
    pub currency: Arc<str>,
}

impl AppState {
    /// Builds the state around one shared document store.
    #[must_use]
    pub fn new(store: JsonLedgerStore, jwt_service: JwtService, currency: &str) -> Self {
        let store = Arc::new(store);
        Self {
            ledger: Arc::new(LedgerService::new(Arc::clone(&store))),
            users: Arc::new(UserService::new(store)),
            jwt_service: Arc::new(jwt_service),
            currency: Arc::from(currency),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new(once(AUTHORIZATION)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
