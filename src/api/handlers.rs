//! Shared server state, error mapping and health check

use crate::library::{LibraryError, LibraryManager};
use crate::AuthConfig;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub library: Arc<LibraryManager>,
    /// Session verification config. None means no session can be verified,
    /// so every write is rejected as unauthenticated
    pub auth_config: Option<AuthConfig>,
}

/// Shared library state
pub type LibraryState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Health check handler. Verifies connectivity to the store.
///
/// Returns 200 + `"ok"` when the store answers, 503 + `"unhealthy"` otherwise.
pub async fn health(State(state): State<LibraryState>) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = state
        .library
        .store()
        .health_check()
        .await
        .unwrap_or(false);

    let (http_status, status, store) = if store_ok {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: store.to_string(),
        }),
    )
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound(_) => AppError::NotFound(err.to_string()),
            LibraryError::InvalidContent => AppError::BadRequest(err.to_string()),
            LibraryError::Unauthenticated => AppError::Unauthorized(err.to_string()),
            // Stored data is corrupt; the caller gets no detail
            LibraryError::BrokenHierarchy { .. } => {
                AppError::Internal(anyhow::anyhow!("Library data is inconsistent"))
            }
            LibraryError::Store(e) => AppError::Internal(e),
        }
    }
}
