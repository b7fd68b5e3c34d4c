//! Session middleware for Axum routes.
//!
//! Validates an optional JWT Bearer token and injects its Claims into request
//! extensions. Reads stay public: any request without a usable session passes
//! through anonymously, and write handlers turn the missing identity into
//! `Unauthenticated`.

use crate::api::handlers::LibraryState;
use crate::auth::jwt::{decode_jwt, Claims};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Middleware that attaches the caller's session, if any.
///
/// # Behavior
/// 1. No `Authorization` header → continue anonymously
/// 2. Header not `Bearer <token>` → continue anonymously
/// 3. No auth config (sessions cannot be verified) → continue anonymously
/// 4. Token invalid/expired → continue anonymously
/// 5. Otherwise inject `Claims` into request extensions
pub async fn resolve_session(
    State(state): State<LibraryState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(claims) = session_claims(&state, &req) {
        req.extensions_mut().insert(claims);
    }

    next.run(req).await
}

fn session_claims(state: &LibraryState, req: &Request) -> Option<Claims> {
    let auth_header = req.headers().get("authorization")?.to_str().ok()?;

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        tracing::debug!("Ignoring non-Bearer Authorization header");
        return None;
    };

    let Some(auth_config) = state.auth_config.as_ref() else {
        tracing::debug!("Ignoring session token: sessions are not configured");
        return None;
    };

    match decode_jwt(token, &auth_config.jwt_secret) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Ignoring invalid session token: {}", e);
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
