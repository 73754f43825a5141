//! HTTP surface for TradingView webhooks and the polling expert advisor.
//!
//! Routes:
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /` | service status |
//! | `GET /health` | health check |
//! | `POST /webhook` | submit an alert |
//! | `GET /get_signal` | fetch the pending signal |
//! | `POST /confirm_execution/:signal_id` | confirm execution |
//! | `GET /mappings`, `POST /mappings` | list / add symbol aliases |

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

use crate::application::{Alert, Fetch, MappingRequest, Relay};
use crate::error::{ErrorKind, RelayError, Result};

/// Name reported by the status route.
pub const SERVICE_NAME: &str = "TradingView to MT4 Bridge";

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
        };
        let body = json!({
            "status": "error",
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Parse a JSON body, reporting problems as validation errors.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> std::result::Result<T, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::Malformed("no JSON body received".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| RelayError::Malformed(e.to_string()))
}

/// Build the router over a shared relay.
pub fn router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .route("/get_signal", get(get_signal))
        .route("/confirm_execution/:signal_id", post(confirm_execution))
        .route("/mappings", get(list_mappings).post(add_mapping))
        .with_state(relay)
}

/// Serve the relay on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, relay: Arc<Relay>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP server listening");
    }
    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn home(State(relay): State<Arc<Relay>>) -> impl IntoResponse {
    let status = relay.status();
    Json(json!({
        "status": "online",
        "service": SERVICE_NAME,
        "last_signal_time": status.last_timestamp,
        "has_pending_signal": status.has_pending,
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

async fn webhook(
    State(relay): State<Arc<Relay>>,
    body: Bytes,
) -> std::result::Result<impl IntoResponse, RelayError> {
    let alert: Alert = parse_body(&body)?;
    let submission = relay.submit(&alert)?;

    Ok(Json(json!({
        "status": "success",
        "signal_id": submission.id,
        "original_symbol": submission.original_symbol,
        "symbol": submission.symbol,
        "message": "Signal recorded",
    })))
}

async fn get_signal(State(relay): State<Arc<Relay>>) -> impl IntoResponse {
    match relay.fetch() {
        Fetch::NoSignal => Json(json!({
            "status": "no_signal",
            "message": "No pending signal",
        })),
        Fetch::Available(signal) => Json(json!({
            "status": "signal_available",
            "signal": signal,
        })),
    }
}

async fn confirm_execution(
    State(relay): State<Arc<Relay>>,
    Path(signal_id): Path<String>,
) -> std::result::Result<impl IntoResponse, RelayError> {
    relay.confirm(&signal_id)?;

    Ok(Json(json!({
        "status": "success",
        "message": "Execution confirmed",
    })))
}

async fn add_mapping(
    State(relay): State<Arc<Relay>>,
    body: Bytes,
) -> std::result::Result<impl IntoResponse, RelayError> {
    let request: MappingRequest = parse_body(&body)?;
    let added = relay.add_mapping(&request)?;

    Ok(Json(json!({
        "status": "success",
        "alias": added.alias,
        "canonical": added.canonical,
        "count": added.count,
    })))
}

async fn list_mappings(State(relay): State<Arc<Relay>>) -> impl IntoResponse {
    let mappings = relay.mappings();
    Json(json!({
        "count": mappings.len(),
        "mappings": mappings,
    }))
}
