//! Router harness for route tests.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};
use coinkeeper_db::{JsonLedgerStore, build_operator};
use coinkeeper_shared::config::StorageProvider;
use coinkeeper_shared::{JwtConfig, JwtService};

/// An in-memory application.
pub(crate) struct TestApp {
    router: Router,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        let operator = build_operator(&StorageProvider::Memory).expect("memory operator");
        let state = AppState::new(
            JsonLedgerStore::new(operator),
            JwtService::new(JwtConfig::default()),
            "KZT",
        );
        Self {
            router: create_router(state),
        }
    }

    pub(crate) async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("readable body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, value)
    }

    pub(crate) async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    pub(crate) async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }

    pub(crate) async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, token, Some(body)).await
    }

    pub(crate) async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("PATCH", uri, token, Some(body)).await
    }

    pub(crate) async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("DELETE", uri, token, None).await
    }

    /// Registers `email` and returns an access token.
    pub(crate) async fn login(&self, email: &str) -> String {
        let credentials = json!({"email": email, "password": "secret1"});
        let (status, _) = self
            .post("/api/v1/auth/register", None, credentials.clone())
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self.post("/api/v1/auth/login", None, credentials).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token").to_string()
    }

    /// Creates expense category `Food` and account `Cash` holding 100.
    pub(crate) async fn seed(&self, token: &str) -> (String, String) {
        let (_, category) = self
            .post(
                "/api/v1/categories",
                Some(token),
                json!({"type": "expense", "name": "Food"}),
            )
            .await;
        let (_, account) = self
            .post(
                "/api/v1/accounts",
                Some(token),
                json!({"name": "Cash", "initialBalance": "100"}),
            )
            .await;
        (
            category["id"].as_str().expect("category id").to_string(),
            account["id"].as_str().expect("account id").to_string(),
        )
    }

    /// Stored balance of one account.
    pub(crate) async fn balance(&self, token: &str, account_id: &str) -> String {
        let (_, account) = self
            .get(&format!("/api/v1/accounts/{account_id}"), Some(token))
            .await;
        account["balance"].as_str().expect("balance").to_string()
    }
}
