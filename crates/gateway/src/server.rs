use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use heartfail_model::{ClinicalRecord, FeatureError, ModelError, ModelService, Outcome};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::templates::{render_error, render_result, FORM_HTML};

/// Read-only state shared by every request
pub struct AppState {
    pub model: ModelService,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(model: ModelService) -> Self {
        Self {
            model,
            start_time: Instant::now(),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    model_hash: String,
    trees: usize,
    classes: Vec<i64>,
    uptime_secs: u64,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<FeatureError> for ApiError {
    fn from(err: FeatureError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        Self::internal(format!("prediction failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, error = %self.message, "request failed");
        let title = self
            .status
            .canonical_reason()
            .unwrap_or("Request failed");
        (self.status, Html(render_error(title))).into_response()
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/result", post(handle_result))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn start_server<F>(state: AppState, addr: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind_listener(addr).await?;
    serve(listener, state, shutdown).await
}

/// Serve on an already bound listener
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(local) = listener.local_addr() {
        info!("Gateway listening on http://{}", local);
    }
    let app = build_router(Arc::new(state));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("gateway server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind gateway listener on {socket_addr}"))
    } else {
        TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind gateway listener on {addr}"))
    }
}

async fn handle_index() -> Html<&'static str> {
    Html(FORM_HTML)
}

async fn handle_result(
    State(state): State<SharedState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Html<String>, ApiError> {
    let record = ClinicalRecord::from_pairs(pairs);
    let features = record.to_feature_vector()?;
    let code = state.model.predict(&features)?;
    let outcome = Outcome::from_code(code);
    debug!(code, outcome = %outcome, "prediction served");
    Ok(Html(render_result(&record, outcome)))
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let model = state.model.model();
    Json(HealthResponse {
        status: "healthy",
        service: "heartfail-gateway",
        version: env!("CARGO_PKG_VERSION"),
        model_hash: state.model.fingerprint().to_string(),
        trees: model.num_trees(),
        classes: model.classes.clone(),
        uptime_secs: state.uptime_seconds(),
    })
}
