// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use sales_incentive_api::{ApiConfig, BcryptCredentialHasher};
use sales_incentive_persistence::SqlitePersistence;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router, prepare_database};

pub const ADMIN_PASSWORD: &str = "test-admin-password";

/// Lowest cost bcrypt accepts; keeps logins fast.
const TEST_BCRYPT_COST: u32 = 4;

/// Builds a router over a fresh, bootstrapped in-memory database.
pub fn create_test_app() -> Router {
    let mut persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    let hasher: BcryptCredentialHasher = BcryptCredentialHasher::new(TEST_BCRYPT_COST);
    prepare_database(&mut persistence, &hasher, ADMIN_PASSWORD).expect("Failed to bootstrap");

    build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        hasher: Arc::new(hasher),
        config: ApiConfig::default(),
    })
}

/// Sends a request and returns the status with the JSON body (`Null` when
/// the body is empty or not JSON).
pub async fn send_request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let request: Request<Body> = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

/// Logs in and returns the session token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send_request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {username}: {body}");
    body["session_token"].as_str().unwrap().to_string()
}

pub async fn login_admin(app: &Router) -> String {
    login(app, "admin", ADMIN_PASSWORD).await
}

/// Creates a sales rep as the admin and returns `(user_id, token)`.
pub async fn create_rep(app: &Router, admin_token: &str, username: &str) -> (i64, String) {
    let password: String = format!("{username}-pass");
    let (status, body) = send_request(
        app,
        "POST",
        "/api/users",
        Some(admin_token),
        Some(json!({
            "username": username,
            "email": format!("{username}@company.com"),
            "password": password,
            "role": "sales_rep",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");

    let user_id: i64 = body["user_id"].as_i64().unwrap();
    let token: String = login(app, username, &password).await;
    (user_id, token)
}

pub fn sale_body(product: &str, amount: &str) -> Value {
    json!({
        "customer_name": "Acme Corp",
        "product_name": product,
        "amount": amount,
        "sale_date": "2026-03-15",
    })
}
