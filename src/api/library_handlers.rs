//! Library API handlers

use crate::auth::extractor::AuthUser;
use crate::library::{
    CategoryDetails, CommentView, Identity, LevelPartition, LibraryError, LibraryMeta,
    RoadmapDetails, RoadmapsMeta, StaticPaths,
};
use crate::neo4j::models::{CategoryNode, ResourceNode, RoadmapNode};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::handlers::{AppError, LibraryState};

// ============================================================================
// Request/Response types
// ============================================================================

/// `?uri=` query shared by point lookups
#[derive(Debug, Deserialize)]
pub struct UriQuery {
    pub uri: String,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub uri: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct PathResponse {
    pub path: Vec<String>,
}

#[derive(Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

// ============================================================================
// Categories
// ============================================================================

/// Get a category with its parent and children
pub async fn get_category(
    State(state): State<LibraryState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<CategoryDetails>, AppError> {
    Ok(Json(state.library.get_category(&query.uri).await?))
}

/// Root-first path from the forest root to a category
pub async fn get_category_path(
    State(state): State<LibraryState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<PathResponse>, AppError> {
    let path = state.library.full_path(&query.uri).await?;
    Ok(Json(PathResponse { path }))
}

/// Whether a URI names a category
pub async fn category_exists(
    State(state): State<LibraryState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<ExistsResponse>, AppError> {
    let exists = state.library.is_category(&query.uri).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// List every category
pub async fn list_categories(
    State(state): State<LibraryState>,
) -> Result<Json<Vec<CategoryNode>>, AppError> {
    Ok(Json(state.library.list_categories().await?))
}

/// List root categories
pub async fn list_root_categories(
    State(state): State<LibraryState>,
) -> Result<Json<Vec<CategoryNode>>, AppError> {
    Ok(Json(state.library.list_root_categories().await?))
}

/// Every routable category and resource path, by depth
pub async fn get_static_paths(
    State(state): State<LibraryState>,
) -> Result<Json<StaticPaths>, AppError> {
    Ok(Json(state.library.static_paths().await?))
}

// ============================================================================
// Resources
// ============================================================================

/// Get a resource by URI
pub async fn get_resource(
    State(state): State<LibraryState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<ResourceNode>, AppError> {
    Ok(Json(state.library.get_resource(&query.uri).await?))
}

/// List every resource
pub async fn list_resources(
    State(state): State<LibraryState>,
) -> Result<Json<Vec<ResourceNode>>, AppError> {
    Ok(Json(state.library.list_resources().await?))
}

/// Comments of a resource, newest first
pub async fn list_comments(
    State(state): State<LibraryState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<Vec<CommentView>>, AppError> {
    Ok(Json(state.library.comments(&query.uri).await?))
}

/// Validate a comment submission: session first, then body shape
fn comment_submission(
    user: Option<AuthUser>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<(Identity, AddCommentRequest), AppError> {
    let identity = user
        .map(|u| u.identity())
        .ok_or(LibraryError::Unauthenticated)?;
    let Json(req) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok((identity, req))
}

/// Add a comment to a resource as the session's member
pub async fn add_comment(
    State(state): State<LibraryState>,
    user: Option<AuthUser>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let (identity, req) = comment_submission(user, payload)?;
    let comment = state
        .library
        .add_comment(&req.uri, Some(&identity), &req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

// ============================================================================
// Roadmaps
// ============================================================================

/// List every roadmap
pub async fn get_roadmaps_meta(
    State(state): State<LibraryState>,
) -> Result<Json<RoadmapsMeta>, AppError> {
    Ok(Json(state.library.roadmaps_meta().await?))
}

/// Roadmaps by depth
pub async fn get_roadmap_levels(
    State(state): State<LibraryState>,
) -> Result<Json<LevelPartition<RoadmapNode>>, AppError> {
    Ok(Json(state.library.roadmap_levels().await?))
}

/// Get a roadmap with its comments, newest first
pub async fn get_roadmap(
    State(state): State<LibraryState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<RoadmapDetails>, AppError> {
    Ok(Json(state.library.get_roadmap(&query.uri).await?))
}

/// Add a comment to a roadmap as the session's member
pub async fn add_roadmap_comment(
    State(state): State<LibraryState>,
    user: Option<AuthUser>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let (identity, req) = comment_submission(user, payload)?;
    let comment = state
        .library
        .add_roadmap_comment(&req.uri, Some(&identity), &req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

// ============================================================================
// Meta
// ============================================================================

/// Catalog counts
pub async fn get_meta(State(state): State<LibraryState>) -> Result<Json<LibraryMeta>, AppError> {
    Ok(Json(state.library.meta().await?))
}
