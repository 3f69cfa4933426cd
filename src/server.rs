use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::tools::{Capabilities, CapabilityRouter, DispatchError, NormalizedResult};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let client = BackendClient::from_config(&config.backend)?;
    info!(
        name: "backend.config.loaded",
        base_url = %client.base_url(),
        "Backend configuration loaded"
    );

    let state = AppState {
        router: Arc::new(CapabilityRouter::new(Arc::new(client))),
    };
    let app = build_app(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Servidor MCP-TESS rodando em http://localhost:{}",
        config.server.port
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the HTTP surface over an already constructed state.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/capabilities", get(capabilities))
        .route("/tools/{tool_name}", post(call_tool))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /capabilities - Static tool catalog.
async fn capabilities(State(state): State<AppState>) -> Json<Capabilities> {
    Json(state.router.capabilities())
}

/// POST /tools/{tool_name} - Invoke one tool with a JSON parameter object.
async fn call_tool(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Result<Json<NormalizedResult>, Response> {
    let params = parse_params(&body).map_err(IntoResponse::into_response)?;

    state
        .router
        .dispatch(&tool_name, params)
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// An empty body is an empty parameter object.
fn parse_params(body: &[u8]) -> Result<Value, (StatusCode, Json<Value>)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("JSON inválido: {e}") })),
        )
    })
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Self::Failed(envelope) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
            }
        }
    }
}
