//! HTTP surface: routes, extractors and server startup.
//!
//! | Method | Path          | Body                      | Handler                  |
//! |--------|---------------|---------------------------|--------------------------|
//! | GET    | `/health`     | (none)                    | [`health_check`]         |
//! | POST   | `/debug-url`  | any JSON object           | [`debug_url`]            |
//! | POST   | `/parse`      | multipart, field `file`   | [`parse_document`]       |
//! | POST   | `/parse-text` | multipart, field `file`   | [`parse_text_only`]      |
//! | POST   | `/parse-url`  | `{"file_url": "<url>"}`   | [`parse_document_from_url`] |
//!
//! Handlers only extract the request and delegate to [`Gateway`]; every error
//! is a [`GatewayError`] rendered as `{"detail": "..."}`.

use crate::error::GatewayError;
use crate::gateway::{Gateway, Upload};
use crate::output::{DebugEcho, ExtractedText, HealthStatus, ParsedDocument};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Body of `POST /parse-url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUrlRequest {
    pub file_url: String,
}

/// Build the router with all endpoints.
pub fn build_router(gateway: Gateway) -> Router {
    let body_limit = gateway.config().max_upload_bytes;
    Router::new()
        .route("/health", get(health_check))
        .route("/debug-url", post(debug_url))
        .route("/parse", post(parse_document))
        .route("/parse-text", post(parse_text_only))
        .route("/parse-url", post(parse_document_from_url))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

/// Serve on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, gateway: Gateway) -> std::io::Result<()> {
    axum::serve(listener, build_router(gateway)).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    gateway: Gateway,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(gateway))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `config.bind_addr` and serve.
pub async fn start_server(gateway: Gateway) -> std::io::Result<()> {
    let addr = gateway.config().bind_addr.clone();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    serve(listener, gateway).await
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// Liveness probe.
pub async fn health_check(State(gateway): State<Gateway>) -> Json<HealthStatus> {
    Json(gateway.health())
}

/// Echo the received JSON object back with its type name.
pub async fn debug_url(
    body: Result<Json<serde_json::Map<String, serde_json::Value>>, JsonRejection>,
) -> Result<Json<DebugEcho>, GatewayError> {
    let Json(received) = body.map_err(json_rejection)?;
    info!("Debug endpoint received: {:?}", received);
    Ok(Json(DebugEcho {
        received: serde_json::Value::Object(received),
        kind: "dict".to_string(),
    }))
}

/// Parse an uploaded document.
pub async fn parse_document(
    State(gateway): State<Gateway>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParsedDocument>, GatewayError> {
    let upload = read_upload(multipart, gateway.config().max_upload_bytes).await?;
    gateway.parse(upload).await.map(Json)
}

/// Extract plain text from an uploaded document.
pub async fn parse_text_only(
    State(gateway): State<Gateway>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractedText>, GatewayError> {
    let upload = read_upload(multipart, gateway.config().max_upload_bytes).await?;
    gateway.parse_text(upload).await.map(Json)
}

/// Fetch a document by URL and parse it.
pub async fn parse_document_from_url(
    State(gateway): State<Gateway>,
    body: Result<Json<FileUrlRequest>, JsonRejection>,
) -> Result<Json<ParsedDocument>, GatewayError> {
    let Json(request) = body.map_err(json_rejection)?;
    gateway.parse_url(&request.file_url).await.map(Json)
}

// ── Extraction helpers ───────────────────────────────────────────────────

/// Pull the `file` part out of a multipart body. Other parts are skipped.
///
/// The part must carry a filename, as browsers send for file inputs.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
    limit: usize,
) -> Result<Upload, GatewayError> {
    let mut multipart = multipart.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let field_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::UploadTooLarge { limit }
        } else {
            GatewayError::InvalidRequest(format!("Invalid multipart body: {}", e.body_text()))
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        if field.name() != Some("file") {
            continue;
        }
        // A plain form value under `file` is not an upload.
        let Some(filename) = field.file_name().map(str::to_owned) else {
            return Err(GatewayError::InvalidRequest(
                "Field 'file' must be a file upload".to_string(),
            ));
        };
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(field_error)?;
        return Ok(Upload {
            filename: Some(filename),
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(GatewayError::InvalidRequest(
        "Field required: file".to_string(),
    ))
}

fn json_rejection(e: JsonRejection) -> GatewayError {
    GatewayError::InvalidRequest(e.body_text())
}
