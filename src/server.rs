// server.rs — HTTP bridge endpoint.
//
// Axum server on 127.0.0.1 (local only). Bridges HTTP calls to the capability
// dispatcher.
//
// Endpoints:
//   POST /mcp      JSON-RPC capability calls
//   GET  /health   liveness + workspace root (independent of the registry)

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::capabilities;
use crate::protocol::{self, BridgeRequest, BridgeResponse, RpcError, INVALID_REQUEST};
use crate::AppContext;

pub async fn start_server(ctx: Arc<AppContext>, port: u16) -> anyhow::Result<()> {
    let bind = format!("127.0.0.1:{port}");
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("bridge listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/mcp", post(handle_rpc))
        .route("/health", get(health))
        // Single trusted local consumer — cross-origin calls are fine.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// POST /mcp — parse, dispatch, envelope.
///
/// The `id` is pulled out of the raw body first so it can be echoed even when
/// the rest of the envelope fails to parse; a body with no usable id gets
/// `id: null` in the error response.
async fn handle_rpc(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<Value>,
) -> Json<BridgeResponse> {
    let id = body.get("id").cloned().unwrap_or(Value::Null);

    let request: BridgeRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(e) => {
            warn!(err = %e, "malformed bridge request");
            return Json(BridgeResponse::error(
                id,
                RpcError::new(INVALID_REQUEST, format!("invalid request: {e}")),
            ));
        }
    };

    let arguments = request.params.arguments.unwrap_or_else(|| json!({}));
    let outcome =
        capabilities::dispatch(ctx.settings.as_ref(), &request.params.capability, arguments).await;

    Json(protocol::respond(request.id, outcome))
}

/// GET /health — static liveness info, never consults the guard.
async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": ctx.started_at.elapsed().as_secs(),
        "workspace": ctx
            .settings
            .workspace_root()
            .map(|p| p.display().to_string()),
    }))
}
