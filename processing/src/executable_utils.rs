use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use common::config::{BackendConfig, CommonConfig, Config};
use serde::Deserialize;
use serde_json::json;
use std::{
    error::Error,
    sync::{Arc, Mutex, MutexGuard},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::{
    error::{ShieldError, StoreError},
    model::{OrderRequest, Rule},
    processor::FraudShield,
    scorers::Scorer,
    storage::{InMemoryStore, JsonFileStore, KeyValueStore},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "target/debug/config/total_config.yaml")]
    pub config: String,
}

/// Parses the command line, loads the config file and installs the tracing subscriber.
pub fn initialize_executable() -> Result<Config, Box<dyn Error + Send + Sync>> {
    let args = Args::parse();
    println!("Loading config from: {}", args.config);
    let config = Config::load(&args.config)?;
    initialize_tracing(&config.backend.log_level);
    tracing::debug!(?config, "Loaded config");
    Ok(config)
}

/// `RUST_LOG` wins over the configured level when set.
pub fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    // a subscriber may already be installed, e.g. by a test harness
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn open_store(config: &CommonConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match &config.store_path {
        Some(path) => {
            tracing::info!(path = %path, "Using JSON file store");
            Ok(Arc::new(JsonFileStore::new(path)?))
        }
        None => {
            tracing::warn!("No store_path configured, orders and rules are kept in memory only");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

pub struct AppState<S: Scorer> {
    shield: Arc<Mutex<FraudShield<S>>>,
}

impl<S: Scorer> AppState<S> {
    pub fn new(shield: FraudShield<S>) -> Self {
        Self {
            shield: Arc::new(Mutex::new(shield)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, FraudShield<S>>, ApiError> {
        self.shield
            .lock()
            .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "service state poisoned"))
    }
}

impl<S: Scorer> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            shield: Arc::clone(&self.shield),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(kind: &str, id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{kind} {id} not found"))
    }
}

impl From<ShieldError> for ApiError {
    fn from(e: ShieldError) -> Self {
        let status = match &e {
            ShieldError::MalformedOrder(_) => StatusCode::BAD_REQUEST,
            ShieldError::InvalidStatusTransition { .. } | ShieldError::DuplicateRule(_) => {
                StatusCode::CONFLICT
            }
            ShieldError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "Request failed");
        }
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct WeightUpdate {
    pub weight: u32,
}

pub fn build_router<S: Scorer + 'static>(
    state: AppState<S>,
    allowed_origin: Option<HeaderValue>,
) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/orders", post(submit_order::<S>).get(list_orders::<S>))
        .route("/api/orders/{id}/approve", post(approve_order::<S>))
        .route("/api/orders/{id}/block", post(block_order::<S>))
        .route("/api/rules", get(list_rules::<S>).post(add_rule::<S>))
        .route("/api/rules/{id}/toggle", post(toggle_rule::<S>))
        .route("/api/rules/{id}/weight", put(update_rule_weight::<S>))
        .route("/api/analytics", get(analytics::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match allowed_origin {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
        None => router,
    }
}

pub async fn run_backend<S: Scorer + 'static>(
    config: BackendConfig,
    shield: FraudShield<S>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let allowed_origin = config
        .allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()?;
    let app = build_router(AppState::new(shield), allowed_origin);

    tracing::info!("Starting backend service at {}", config.server_address);
    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn submit_order<S: Scorer>(
    State(state): State<AppState<S>>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    // undecodable bodies are malformed orders, reported like any other
    let Json(request) = payload.map_err(|rejection| ShieldError::MalformedOrder(rejection.body_text()))?;
    let record = state.lock()?.submit_order(request)?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

pub async fn list_orders<S: Scorer>(State(state): State<AppState<S>>) -> Result<Response, ApiError> {
    let orders = state.lock()?.orders();
    Ok(Json(orders).into_response())
}

pub async fn approve_order<S: Scorer>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.lock()?.approve_order(&id)? {
        Some(record) => Ok(Json(record).into_response()),
        None => Err(ApiError::not_found("order", &id)),
    }
}

pub async fn block_order<S: Scorer>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.lock()?.block_order(&id)? {
        Some(record) => Ok(Json(record).into_response()),
        None => Err(ApiError::not_found("order", &id)),
    }
}

pub async fn list_rules<S: Scorer>(State(state): State<AppState<S>>) -> Result<Response, ApiError> {
    let rules = state.lock()?.rules();
    Ok(Json(rules).into_response())
}

pub async fn add_rule<S: Scorer>(
    State(state): State<AppState<S>>,
    Json(rule): Json<Rule>,
) -> Result<Response, ApiError> {
    let rule = state.lock()?.add_rule(rule)?;
    Ok((StatusCode::CREATED, Json(rule)).into_response())
}

pub async fn toggle_rule<S: Scorer>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.lock()?.toggle_rule(&id)? {
        Some(rule) => Ok(Json(rule).into_response()),
        None => Err(ApiError::not_found("rule", &id)),
    }
}

pub async fn update_rule_weight<S: Scorer>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(update): Json<WeightUpdate>,
) -> Result<Response, ApiError> {
    match state.lock()?.update_rule_weight(&id, update.weight)? {
        Some(rule) => Ok(Json(rule).into_response()),
        None => Err(ApiError::not_found("rule", &id)),
    }
}

pub async fn analytics<S: Scorer>(State(state): State<AppState<S>>) -> Result<Response, ApiError> {
    let snapshot = state.lock()?.analytics();
    Ok(Json(snapshot).into_response())
}
