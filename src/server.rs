//! HTTP surface: one POST route per pipeline plus a health check.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::PipelineError;
use crate::pipeline::{Pipeline, PipelineOutcome};
use crate::security::{is_authorized, API_KEY_HEADER};

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub event: Arc<Pipeline>,
    pub report: Arc<Pipeline>,
    pub organisation: Arc<Pipeline>,
    pub faq: Arc<Pipeline>,
    pub api_key: Option<Arc<str>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/event-create", post(event_create))
        .route("/report/translate", post(report_translate))
        .route("/organisation/translate", post(organisation_translate))
        .route("/faq/translate", post(faq_translate))
        .route(HEALTH_PATH, get(health))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !is_authorized(state.api_key.as_deref(), provided) {
        warn!("Rejected request to {}: invalid API key", request.uri().path());
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized".to_string(),
            }),
        )
            .into_response();
    }

    next.run(request).await
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn event_create(State(state): State<AppState>, body: Bytes) -> Response {
    handle(&state.event, &body).await
}

async fn report_translate(State(state): State<AppState>, body: Bytes) -> Response {
    handle(&state.report, &body).await
}

async fn organisation_translate(State(state): State<AppState>, body: Bytes) -> Response {
    handle(&state.organisation, &body).await
}

async fn faq_translate(State(state): State<AppState>, body: Bytes) -> Response {
    handle(&state.faq, &body).await
}

/// Parse the body, run the pipeline and map the outcome onto a response.
///
/// Input errors are reported in the body of a 200 response. Moderation
/// aborts use status 420. Backend failures are 500.
async fn handle(pipeline: &Pipeline, body: &[u8]) -> Response {
    let input: Value = match serde_json::from_slice(body) {
        Ok(input) => input,
        Err(e) => return error_response(&PipelineError::MalformedInput(e.to_string())),
    };

    match pipeline.run(&input).await {
        Ok(PipelineOutcome::Completed(record)) => Json(Value::Object(record)).into_response(),
        Ok(PipelineOutcome::Aborted(abort)) => {
            // 420 is outside the registered range but still a valid status code
            let status =
                StatusCode::from_u16(abort.status()).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY);
            (status, Json(abort.body())).into_response()
        }
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &PipelineError) -> Response {
    let status = if e.is_input_error() {
        StatusCode::OK
    } else {
        error!("Request failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let error = e.client_message();
    (status, Json(ErrorResponse { error })).into_response()
}
