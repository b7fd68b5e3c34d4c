//! AuthUser extractor for Axum handlers.
//!
//! Reads the member identity from request extensions (populated by the
//! `resolve_session` middleware). Handlers that write take `Option<AuthUser>`
//! and pass the resulting identity, or its absence, to the library.

use crate::api::handlers::{AppError, LibraryState};
use crate::auth::jwt::Claims;
use crate::library::Identity;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use uuid::Uuid;

/// Authenticated member identity extracted from session claims.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
}

impl AuthUser {
    /// Create from JWT claims
    fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(Self {
            user_id,
            name: claims.name.clone(),
        })
    }

    /// Identity handed to library write operations
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            name: self.name.clone(),
        }
    }
}

impl FromRequestParts<LibraryState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &LibraryState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async {
            let claims = parts.extensions.get::<Claims>().ok_or_else(|| {
                AppError::Unauthorized("Authentication required".to_string())
            })?;

            Self::from_claims(claims)
        }
    }
}

impl OptionalFromRequestParts<LibraryState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &LibraryState,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        async {
            match parts.extensions.get::<Claims>() {
                Some(claims) => Self::from_claims(claims).map(Some),
                None => Ok(None),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
