//! API route definitions

use super::handlers::{self, LibraryState};
use super::library_handlers;
use crate::auth::middleware::resolve_session;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: LibraryState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // ====================================================================
        // Categories
        // ====================================================================
        .route("/api/library/category", get(library_handlers::get_category))
        .route(
            "/api/library/category/path",
            get(library_handlers::get_category_path),
        )
        .route(
            "/api/library/category/exists",
            get(library_handlers::category_exists),
        )
        .route(
            "/api/library/categories",
            get(library_handlers::list_categories),
        )
        .route(
            "/api/library/categories/roots",
            get(library_handlers::list_root_categories),
        )
        .route(
            "/api/library/static-paths",
            get(library_handlers::get_static_paths),
        )
        // ====================================================================
        // Resources
        // ====================================================================
        .route("/api/library/resource", get(library_handlers::get_resource))
        .route(
            "/api/library/resources",
            get(library_handlers::list_resources),
        )
        .route(
            "/api/library/resource/comments",
            get(library_handlers::list_comments).post(library_handlers::add_comment),
        )
        .route("/api/library/meta", get(library_handlers::get_meta))
        // ====================================================================
        // Roadmaps
        // ====================================================================
        .route(
            "/api/roadmaps/meta",
            get(library_handlers::get_roadmaps_meta),
        )
        .route(
            "/api/roadmaps/levels",
            get(library_handlers::get_roadmap_levels),
        )
        .route("/api/roadmaps/roadmap", get(library_handlers::get_roadmap))
        .route(
            "/api/roadmaps/comment",
            post(library_handlers::add_roadmap_comment),
        )
        .layer(from_fn_with_state(state.clone(), resolve_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
