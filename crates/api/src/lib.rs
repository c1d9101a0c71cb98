pub mod config;
mod rate_limit;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use safar_agents::{ChatCompletionsClient, Completion, CompletionModel, PlanSource, PlannerAgent};
use safar_core::{PlanError, TripPolicy, TripRequestInput};
use safar_observability::{AppMetrics, MetricsSnapshot};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use crate::config::ApiConfig;
pub use crate::rate_limit::IpRateLimiter;

pub const PLAN_SOURCE_HEADER: &str = "x-plan-source";

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<PlannerAgent<Completion>>,
    pub metrics: Arc<AppMetrics>,
    pub limiter: IpRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthCapabilities {
    model_configured: bool,
    model: String,
}

impl ApiState {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let metrics = AppMetrics::shared();
        let completion = match config.model {
            Some(model) => Completion::Remote(ChatCompletionsClient::new(model)?),
            None => Completion::Offline,
        };
        info!(
            model = completion.name(),
            remote = completion.is_remote(),
            "completion model selected"
        );

        let agent = Arc::new(PlannerAgent::new(
            completion,
            TripPolicy::default(),
            metrics.clone(),
        ));

        Ok(Self {
            agent,
            metrics,
            limiter: IpRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
            allowed_origins: Arc::new(config.allowed_origins),
        })
    }
}

pub fn build_app(config: ApiConfig) -> Result<Router> {
    Ok(build_router(ApiState::new(config)?))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/trip/generate", post(generate_trip))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let model = state.agent.model();
    let payload = HealthResponse {
        status: "ok",
        message: "Trip Planner API is running!",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            model_configured: model.is_remote(),
            model: model.name().to_string(),
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn generate_trip(
    State(state): State<ApiState>,
    payload: Result<Json<TripRequestInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text());
        }
    };

    match state.agent.plan(&input).await {
        Ok(outcome) => {
            let source = match outcome.source {
                PlanSource::Model => "model",
                PlanSource::Fallback => "fallback",
            };
            (
                StatusCode::OK,
                [(PLAN_SOURCE_HEADER, HeaderValue::from_static(source))],
                Json(outcome.plan),
            )
                .into_response()
        }
        Err(PlanError::InvalidRequest(message)) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_request", message)
        }
        // Model failures are recovered inside the agent.
        Err(error) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "plan_failed",
            error.to_string(),
        ),
    }
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "message": message.into()
        })),
    )
        .into_response()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::HeaderName::from_static(PLAN_SOURCE_HEADER)])
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded for this IP",
        );
    }

    next.run(request).await
}

fn is_public_endpoint(path: &str) -> bool {
    matches!(path, "/health")
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "local".to_string())
}

/// Spawns a task that periodically forgets idle limiter entries.
pub fn spawn_limiter_janitor(state: &ApiState) -> tokio::task::JoinHandle<()> {
    let limiter = state.limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            ticker.tick().await;
            limiter.prune();
        }
    })
}
