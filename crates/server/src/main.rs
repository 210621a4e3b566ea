// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use rust_decimal::Decimal;
use sales_incentive_api::{
    ApiConfig, ApiError, AuthenticationService, BcryptCredentialHasher, BootstrapResponse,
    CreateUserRequest, CredentialHasher, DeleteUserResponse, ListRulesResponse, ListSalesResponse,
    ListUsersResponse, LoginRequest, LoginResponse, RecordSaleRequest, ResolveCommissionRequest,
    ResolveCommissionResponse, RuleResponse, SaleResponse, SalesStatsResponse,
    SetRuleActiveRequest, UpdateUserRequest, UpsertRuleRequest, UserResponse, WhoAmIResponse,
    rate_from_percent,
};
use sales_incentive_domain::CommissionRate;
use sales_incentive_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionActor;

/// Administrator password used when none is configured.
const FALLBACK_ADMIN_PASSWORD: &str = "admin123";

/// Sales Incentive Server - HTTP server for the Sales Incentive Tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "BIND_ADDRESS", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Fallback commission rate in percent, used when no rule applies
    #[arg(long, env = "DEFAULT_COMMISSION_RATE", default_value = "5.0")]
    default_rate: Decimal,

    /// Session lifetime in hours, at most one year
    #[arg(
        long,
        env = "SESSION_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=8760)
    )]
    session_hours: i64,

    /// Password for the bootstrap administrator account
    #[arg(long, env = "ADMIN_PASSWORD")]
    admin_password: Option<String>,

    /// Bcrypt cost factor for password hashing
    #[arg(long, env = "BCRYPT_COST")]
    bcrypt_cost: Option<u32>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer; one writer at a time.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Hashes and verifies passwords.
    hasher: Arc<dyn CredentialHasher>,
    /// Commission and session settings.
    config: ApiConfig,
}

/// Query parameters for sales listings and statistics.
#[derive(Debug, Default, Deserialize)]
struct SalesQuery {
    /// Restrict to one user's sales.
    user_id: Option<i64>,
}

/// API response for the health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `ok` when the server is answering.
    status: String,
}

/// API response for write operations without a richer payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUser { .. } => StatusCode::CONFLICT,
            ApiError::SelfDeletion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Health and authentication
// ============================================================================

/// Handler for GET `/api/health`.
#[allow(clippy::unused_async)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/api/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(username = %req.username, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = sales_incentive_api::login(
        &mut persistence,
        app_state.hasher.as_ref(),
        &app_state.config,
        &req,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, token): SessionActor,
) -> Result<Json<WriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    sales_incentive_api::logout(&mut persistence, &token)?;
    drop(persistence);

    info!(user_id = actor.user_id, "Logged out");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Logged out")),
    }))
}

/// Handler for GET `/api/auth/whoami`.
#[allow(clippy::unused_async)]
async fn handle_whoami(SessionActor(actor, _token): SessionActor) -> Json<WhoAmIResponse> {
    Json(sales_incentive_api::whoami(&actor))
}

// ============================================================================
// Users
// ============================================================================

/// Handler for GET `/api/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListUsersResponse = sales_incentive_api::list_users(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpError> {
    info!(
        actor = actor.user_id,
        username = %req.username,
        "Handling create_user request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: UserResponse = sales_incentive_api::create_user(
        &mut persistence,
        app_state.hasher.as_ref(),
        &req,
        &actor,
    )?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PUT `/api/users/{user_id}`.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: UserResponse = sales_incentive_api::update_user(
        &mut persistence,
        app_state.hasher.as_ref(),
        user_id,
        &req,
        &actor,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/api/users/{user_id}`.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Path(user_id): Path<i64>,
) -> Result<Json<DeleteUserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteUserResponse =
        sales_incentive_api::delete_user(&mut persistence, user_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Commission rules
// ============================================================================

/// Handler for GET `/api/commission/rules`.
async fn handle_list_rules(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
) -> Result<Json<ListRulesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRulesResponse = sales_incentive_api::list_rules(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/commission/rules`.
async fn handle_upsert_rule(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Json(req): Json<UpsertRuleRequest>,
) -> Result<Json<RuleResponse>, HttpError> {
    info!(
        actor = actor.user_id,
        product = %req.product_name,
        rate_percent = %req.rate_percent,
        "Handling upsert_rule request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RuleResponse = sales_incentive_api::upsert_rule(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/commission/rules/{product}/active`.
async fn handle_set_rule_active(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Path(product): Path<String>,
    Json(req): Json<SetRuleActiveRequest>,
) -> Result<Json<RuleResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RuleResponse =
        sales_incentive_api::set_rule_active(&mut persistence, &product, &req, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/commission/resolve`.
async fn handle_resolve_commission(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Json(req): Json<ResolveCommissionRequest>,
) -> Result<Json<ResolveCommissionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ResolveCommissionResponse = sales_incentive_api::resolve_commission(
        &mut persistence,
        &app_state.config,
        &req,
        &actor,
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Sales
// ============================================================================

/// Handler for GET `/api/sales`.
async fn handle_list_sales(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Query(query): Query<SalesQuery>,
) -> Result<Json<ListSalesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListSalesResponse =
        sales_incentive_api::list_sales(&mut persistence, query.user_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/api/sales`.
async fn handle_record_sale(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Json(req): Json<RecordSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), HttpError> {
    info!(
        actor = actor.user_id,
        product = %req.product_name,
        amount = %req.amount,
        "Handling record_sale request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SaleResponse =
        sales_incentive_api::record_sale(&mut persistence, &app_state.config, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for DELETE `/api/sales/{sale_id}`.
async fn handle_delete_sale(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Path(sale_id): Path<i64>,
) -> Result<Json<WriteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    sales_incentive_api::delete_sale(&mut persistence, sale_id, &actor)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deleted sale {sale_id}")),
    }))
}

/// Handler for GET `/api/sales/stats`.
async fn handle_get_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _token): SessionActor,
    Query(query): Query<SalesQuery>,
) -> Result<Json<SalesStatsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: SalesStatsResponse =
        sales_incentive_api::get_stats(&mut persistence, query.user_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/logout", post(handle_logout))
        .route("/api/auth/whoami", get(handle_whoami))
        .route("/api/users", get(handle_list_users).post(handle_create_user))
        .route(
            "/api/users/{user_id}",
            put(handle_update_user).delete(handle_delete_user),
        )
        .route(
            "/api/commission/rules",
            get(handle_list_rules).post(handle_upsert_rule),
        )
        .route(
            "/api/commission/rules/{product}/active",
            post(handle_set_rule_active),
        )
        .route("/api/commission/resolve", post(handle_resolve_commission))
        .route("/api/sales", get(handle_list_sales).post(handle_record_sale))
        .route("/api/sales/stats", get(handle_get_stats))
        .route("/api/sales/{sale_id}", delete(handle_delete_sale))
        .with_state(app_state)
}

/// Seeds the administrator and default rule, then clears stale sessions.
fn prepare_database(
    persistence: &mut SqlitePersistence,
    hasher: &dyn CredentialHasher,
    admin_password: &str,
) -> Result<(), ApiError> {
    let bootstrap: BootstrapResponse =
        sales_incentive_api::bootstrap(persistence, hasher, admin_password)?;
    if bootstrap.seeded {
        info!("Seeded bootstrap administrator and default commission rule");
    }

    let purged: usize = AuthenticationService::purge_expired_sessions(persistence)?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Sales Incentive Server");

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let default_rate: CommissionRate = rate_from_percent("default_rate", args.default_rate)?;
    let config: ApiConfig =
        ApiConfig::new(default_rate, time::Duration::hours(args.session_hours));

    let hasher: BcryptCredentialHasher = args
        .bcrypt_cost
        .map_or_else(BcryptCredentialHasher::default, BcryptCredentialHasher::new);

    let admin_password: String = args.admin_password.unwrap_or_else(|| {
        warn!("ADMIN_PASSWORD not set; using the built-in default administrator password");
        String::from(FALLBACK_ADMIN_PASSWORD)
    });

    prepare_database(&mut persistence, &hasher, &admin_password)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        hasher: Arc::new(hasher),
        config,
    };

    let app: Router = build_router(app_state);

    let listener = tokio::net::TcpListener::bind((args.bind.as_str(), args.port)).await?;
    info!(
        default_rate = %default_rate,
        session_hours = args.session_hours,
        "Server listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}
