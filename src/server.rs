//! HTTP surface: `POST /chatbot` and `GET /health`.

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bot::FaqBot;
use crate::config::Settings;
use crate::embedder::Embedder;
use crate::error::FaqError;

/// Shared state for the request handlers.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<FaqBot>,
    pub max_message_chars: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub entries: usize,
    pub model: String,
    pub dimensions: usize,
}

impl ChatRequest {
    pub fn validate(&self, max_chars: usize) -> Result<(), ApiError> {
        if self.message.trim().is_empty() {
            return Err(ApiError::BadRequest("message must not be empty".to_string()));
        }
        let chars = self.message.chars().count();
        if chars > max_chars {
            return Err(ApiError::BadRequest(format!(
                "message is {} characters, limit is {}",
                chars, max_chars
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<FaqError> for ApiError {
    fn from(err: FaqError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => {
                tracing::error!("chatbot request failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

async fn chatbot(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    req.validate(state.max_message_chars)?;

    let bot = Arc::clone(&state.bot);
    let reply = tokio::task::spawn_blocking(move || bot.reply(&req.message))
        .await
        .map_err(|e| ApiError::Internal(format!("matcher task failed: {e}")))??;

    Ok(Json(ChatResponse { reply }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let embedder = state.bot.embedder();
    Json(HealthResponse {
        status: "ok".to_string(),
        entries: state.bot.knowledge_base().len(),
        model: embedder.model_name().to_string(),
        dimensions: embedder.dimensions(),
    })
}

/// Any origin when `origins` is empty, otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/chatbot", post(chatbot))
        .route("/health", get(health))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(settings: &Settings, bot: Arc<FaqBot>) -> anyhow::Result<()> {
    let state = AppState {
        bot,
        max_message_chars: settings.max_message_chars,
    };
    let app = build_router(state, &settings.cors_origins);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("dental FAQ server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
