//! HTTP API server.
//!
//! Exposes the gateway over JSON HTTP. The engine client is injected at
//! startup and shared by every handler; the server holds no other state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/search?q=&limit=` | Full-text search |
//! | `POST` | `/book` | Upsert a book |
//! | `GET` | `/book/{id}` | Fetch a book by id |
//! | `DELETE` | `/book/{id}` | Delete a book by id |
//! | `GET` | `/stats` | Index and cluster diagnostics |
//! | `GET` | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses carry a machine-readable code alongside the message:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "limit must be between 1 and 50, got 51" } }
//! ```
//!
//! Codes: `bad_request` (400), `validation` (422), `not_found` (404),
//! `backend_error` (502). Error kinds are mapped from the structured
//! [`GatewayError`] variants, never by inspecting message text.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::engine::EngineClient;
use crate::error::GatewayError;
use crate::lifecycle;
use crate::model::{Book, SearchResponse};
use crate::query;
use crate::search::search_books;
use crate::stats;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<EngineClient>,
}

/// Start the HTTP server on the configured bind address.
///
/// The engine client is constructed by the caller and lives for the whole
/// process; handlers borrow it through the shared state.
pub async fn run_server(config: &Config, engine: Arc<EngineClient>) -> anyhow::Result<()> {
    let state = AppState { engine };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/search", get(handle_search))
        .route("/book", post(handle_upsert))
        .route("/book/{id}", get(handle_fetch).delete(handle_delete))
        .route("/stats", get(handle_stats))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    tracing::info!(bind = %config.server.bind, "gateway listening");
    println!("bookdex listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map a gateway error to an HTTP response. Validation errors on query
/// parameters are a 400; validation errors on a request body are a 422
/// (`validation_status` picks which).
fn map_error(err: GatewayError, validation_status: StatusCode) -> ApiError {
    match err {
        GatewayError::Validation(message) => ApiError {
            status: validation_status,
            code: if validation_status == StatusCode::UNPROCESSABLE_ENTITY {
                "validation"
            } else {
                "bad_request"
            },
            message,
        },
        GatewayError::NotFound(message) => ApiError {
            status: StatusCode::NOT_FOUND,
            code: "not_found",
            message,
        },
        GatewayError::Backend(message) => {
            tracing::error!(%message, "engine call failed");
            ApiError {
                status: StatusCode::BAD_GATEWAY,
                code: "backend_error",
                message,
            }
        }
    }
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    limit: Option<i64>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let limit = params.limit.unwrap_or(query::DEFAULT_LIMIT);
    let response = search_books(&state.engine, &params.q, limit)
        .await
        .map_err(|e| map_error(e, StatusCode::BAD_REQUEST))?;
    Ok(Json(response))
}

// ============ POST /book ============

async fn handle_upsert(
    State(state): State<AppState>,
    Json(book): Json<Book>,
) -> Result<Json<lifecycle::UpsertReceipt>, ApiError> {
    let receipt = lifecycle::upsert_book(&state.engine, &book)
        .await
        .map_err(|e| map_error(e, StatusCode::UNPROCESSABLE_ENTITY))?;
    Ok(Json(receipt))
}

// ============ GET /book/{id} ============

#[derive(Serialize)]
struct FetchResponse {
    id: String,
    found: bool,
    data: Option<Book>,
}

async fn handle_fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match lifecycle::fetch_book(&state.engine, &id).await {
        Ok(book) => Ok(Json(FetchResponse {
            id,
            found: true,
            data: Some(book),
        })
        .into_response()),
        // Not-found is a normal outcome with its own body shape, not a
        // generic error response.
        Err(GatewayError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(FetchResponse {
                id,
                found: false,
                data: None,
            }),
        )
            .into_response()),
        Err(e) => Err(map_error(e, StatusCode::BAD_REQUEST)),
    }
}

// ============ DELETE /book/{id} ============

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
    message: String,
    result: String,
}

async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match lifecycle::delete_book(&state.engine, &id).await {
        Ok(receipt) => Ok(Json(DeleteResponse {
            success: receipt.success,
            message: receipt.message,
            result: receipt.result,
        })
        .into_response()),
        Err(GatewayError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(DeleteResponse {
                success: false,
                message: format!("no book with id {}", id),
                result: "not_found".to_string(),
            }),
        )
            .into_response()),
        Err(e) => Err(map_error(e, StatusCode::BAD_REQUEST)),
    }
}

// ============ GET /stats ============

async fn handle_stats(
    State(state): State<AppState>,
) -> Result<Json<stats::StatsReport>, ApiError> {
    let report = stats::report(&state.engine)
        .await
        .map_err(|e| map_error(e, StatusCode::BAD_REQUEST))?;
    Ok(Json(report))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
