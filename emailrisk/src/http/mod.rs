// JSON ingress + admin API, built on axum — the teacher's own
// closest analogue (`grpc_api.rs`) is a bespoke length-prefixed
// TCP/JSON protocol, not an idiomatic way to expose the HTTP surface
// this spec calls for; `axum` is the crate the sibling example repos
// in the pack reach for instead.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::config::{ConfigPatch, Configuration};
use crate::error::ErrorKind;
use crate::orchestrator::Orchestrator;
use crate::otel::Metrics;
use crate::types::{RawEmail, RequestMeta};

pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub metrics: Arc<Metrics>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/admin/config", get(get_config).put(put_config).patch(patch_config))
        .route("/admin/config/validate", post(validate_config))
        .route("/admin/config/reset", post(reset_config))
        .route("/admin/config/cache", delete(invalidate_config))
        .route_layer(middleware::from_fn_with_state(Arc::clone(&state), require_api_key));

    Router::new()
        .route("/v1/validate", post(validate))
        .route("/admin/health", get(health))
        .route("/metrics", get(metrics))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn require_api_key(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let provided = headers.get("X-API-Key").and_then(|v| v.to_str().ok()).unwrap_or("");
    let expected = state.orchestrator.config.get().await.secrets.admin_api_key;
    if expected.is_empty() || provided != expected {
        return (StatusCode::UNAUTHORIZED, "missing or invalid X-API-Key").into_response();
    }
    next.run(req).await
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub email: String,
    #[serde(default)]
    pub consumer: Option<String>,
    #[serde(default)]
    pub flow: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub ja4: Option<String>,
    #[serde(default)]
    pub ja3: Option<String>,
    #[serde(default)]
    pub asn: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub decision: String,
    pub risk_score: f64,
    pub signals: crate::types::DetectorSignals,
    pub fingerprint: crate::types::Fingerprint,
    pub message: Option<String>,
    pub latency_ms: u64,
}

async fn validate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateRequest>,
) -> Result<Response, AppError> {
    let meta = RequestMeta {
        ip: body.ip,
        ja4: body.ja4,
        ja3: body.ja3,
        asn: body.asn,
        country: body.country,
        user_agent: body.user_agent,
        device_type: None,
        bot_score: None,
    };

    let result = state
        .orchestrator
        .validate(
            &RawEmail::from(body.email),
            meta,
            body.consumer.unwrap_or_else(|| "default".to_string()),
            body.flow.unwrap_or_else(|| "signup".to_string()),
        )
        .await?;

    let status = if result.decision == crate::types::Decision::Block {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    let response = ValidateResponse {
        valid: result.valid,
        decision: result.decision.to_string(),
        risk_score: result.risk_score,
        signals: result.signals,
        fingerprint: result.fingerprint,
        message: result.message,
        latency_ms: result.latency_ms,
    };

    Ok((status, Json(response)).into_response())
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.prometheus_text()
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<Configuration> {
    Json(state.orchestrator.config.get().await)
}

async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<Configuration>,
) -> Result<Json<Configuration>, AppError> {
    Ok(Json(state.orchestrator.config.put(config).await?))
}

async fn patch_config(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ConfigPatch>,
) -> Result<Json<Configuration>, AppError> {
    Ok(Json(state.orchestrator.config.patch(patch).await?))
}

async fn validate_config(Json(config): Json<Configuration>) -> Result<StatusCode, AppError> {
    config.validate()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_config(State(state): State<Arc<AppState>>) -> Json<Configuration> {
    Json(state.orchestrator.config.reset().await)
}

async fn invalidate_config(State(state): State<Arc<AppState>>) -> StatusCode {
    state.orchestrator.config.invalidate();
    StatusCode::NO_CONTENT
}

struct AppError(ErrorKind);

impl From<ErrorKind> for AppError {
    fn from(e: ErrorKind) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.0.to_string()).into_response()
    }
}
