// Expense Store - REST document store with Axum
//
//   GET  /health                        -> {"status":"ok"}           (no auth)
//   POST /{collection}.json             -> {"name":"<id>"}
//   GET  /{collection}.json[?shallow]   -> null | {"<id>": doc | true}
//
// Collection routes require `Authorization: Bearer <key fingerprint>`. The
// check is a route layer, so it runs before any body or query extraction.

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::db::{get_documents, push_document};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    db: Arc<Mutex<Connection>>,
    bearer: Arc<String>,
}

impl ServerState {
    pub fn new(conn: Connection, bearer: String) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            bearer: Arc::new(bearer),
        }
    }
}

#[derive(Serialize)]
struct PushResponse {
    name: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default)]
    shallow: bool,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn is_authorized(headers: &HeaderMap, bearer: &str) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token == bearer)
        .unwrap_or(false)
}

/// `expenses.json` -> `expenses`
fn collection_name(document: &str) -> Option<&str> {
    document.strip_suffix(".json").filter(|name| {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    })
}

/// Route layer guarding every collection route
async fn require_bearer(State(state): State<ServerState>, request: Request, next: Next) -> Response {
    if !is_authorized(request.headers(), &state.bearer) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected request without valid credentials"
        );
        return error_response(StatusCode::UNAUTHORIZED, "Permission denied");
    }
    next.run(request).await
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /{collection}.json - Whole collection keyed by id
async fn get_collection(
    State(state): State<ServerState>,
    Path(document): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let Some(collection) = collection_name(&document) else {
        return error_response(StatusCode::NOT_FOUND, "Not found");
    };

    let documents = {
        let conn = match state.db.lock() {
            Ok(conn) => conn,
            Err(_) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable"),
        };
        get_documents(&conn, collection)
    };

    match documents {
        Ok(documents) if documents.is_empty() => Json(serde_json::Value::Null).into_response(),
        Ok(documents) => {
            let count = documents.len();
            let body: serde_json::Map<String, serde_json::Value> = documents
                .into_iter()
                .map(|(id, doc)| {
                    let value = if params.shallow {
                        serde_json::Value::Bool(true)
                    } else {
                        doc
                    };
                    (id, value)
                })
                .collect();

            info!(collection, count, shallow = params.shallow, "collection read");
            Json(serde_json::Value::Object(body)).into_response()
        }
        Err(e) => {
            error!(collection, error = %e, "error reading collection");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "read failed")
        }
    }
}

/// POST /{collection}.json - Append one document
async fn push_to_collection(
    State(state): State<ServerState>,
    Path(document): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let Some(collection) = collection_name(&document) else {
        return error_response(StatusCode::NOT_FOUND, "Not found");
    };
    if !body.is_object() {
        return error_response(StatusCode::BAD_REQUEST, "Document must be a JSON object");
    }

    let pushed = {
        let conn = match state.db.lock() {
            Ok(conn) => conn,
            Err(_) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable"),
        };
        push_document(&conn, collection, &body)
    };

    match pushed {
        Ok(id) => {
            info!(collection, id = %id, "document pushed");
            Json(PushResponse { name: id }).into_response()
        }
        Err(e) => {
            error!(collection, error = %e, "error pushing document");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "write failed")
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/:document", get(get_collection).post(push_to_collection))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until the listener fails
pub async fn serve(listener: tokio::net::TcpListener, state: ServerState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
