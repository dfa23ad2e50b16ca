//! Authentication routes for registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use coinkeeper_shared::AppError;
use coinkeeper_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Create a user.
async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state.users.register(&payload.email, &payload.password).await?;
    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}

/// POST /auth/login - Authenticate and issue an access token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;

    let token = state
        .jwt_service
        .generate_access_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        email: user.email,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::testing::TestApp;

    #[tokio::test]
    async fn test_register_then_login() {
        let app = TestApp::new();

        let (status, body) = app
            .post(
                "/api/v1/auth/register",
                None,
                json!({"email": "Ana@Example.com", "password": "secret1"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "ana@example.com");

        let (status, body) = app
            .post(
                "/api/v1/auth/login",
                None,
                json!({"email": "ana@example.com", "password": "secret1"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["expiresIn"], 86_400);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_weak_passwords() {
        let app = TestApp::new();
        let payload = json!({"email": "bo@example.com", "password": "secret1"});

        let (status, _) = app.post("/api/v1/auth/register", None, payload.clone()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app.post("/api/v1/auth/register", None, payload).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "EMAIL_TAKEN");

        let (status, _) = app
            .post(
                "/api/v1/auth/register",
                None,
                json!({"email": "cy@example.com", "password": "123"}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let app = TestApp::new();
        app.post(
            "/api/v1/auth/register",
            None,
            json!({"email": "di@example.com", "password": "secret1"}),
        )
        .await;

        let (status, body) = app
            .post(
                "/api/v1/auth/login",
                None,
                json!({"email": "di@example.com", "password": "wrong-pass"}),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_validation_error() {
        let app = TestApp::new();
        let (status, body) = app
            .post("/api/v1/auth/login", None, json!({"email": "x@y.z"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}
