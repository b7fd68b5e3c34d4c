//! HierarchyStore trait definition
//!
//! Defines the abstract interface over the persistent library store.
//! `Neo4jClient` implements it for production; tests use the in-memory
//! `MockHierarchyStore`.

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Abstract interface for all library store operations.
///
/// Lookups return `Ok(None)` for a missing record; `Err` is reserved for
/// store failures (connection, malformed rows).
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    // ========================================================================
    // Category operations
    // ========================================================================

    /// Get a category by URI
    async fn get_category(&self, uri: &str) -> Result<Option<CategoryNode>>;

    /// List every category
    async fn list_categories(&self) -> Result<Vec<CategoryNode>>;

    /// List categories without a parent
    async fn list_root_categories(&self) -> Result<Vec<CategoryNode>>;

    /// List the direct child categories of `parent_uri`
    async fn list_child_categories(&self, parent_uri: &str) -> Result<Vec<CategoryNode>>;

    /// Count all categories
    async fn count_categories(&self) -> Result<usize>;

    /// Create or replace a category
    async fn upsert_category(&self, category: &CategoryNode) -> Result<()>;

    // ========================================================================
    // Resource operations
    // ========================================================================

    /// Get a resource by URI
    async fn get_resource(&self, uri: &str) -> Result<Option<ResourceNode>>;

    /// List every resource
    async fn list_resources(&self) -> Result<Vec<ResourceNode>>;

    /// List the resources filed under `category_uri`
    async fn list_category_resources(&self, category_uri: &str) -> Result<Vec<ResourceNode>>;

    /// Count all resources
    async fn count_resources(&self) -> Result<usize>;

    /// Create or replace a resource
    async fn upsert_resource(&self, resource: &ResourceNode) -> Result<()>;

    // ========================================================================
    // Roadmap operations
    // ========================================================================

    /// Get a roadmap by URI
    async fn get_roadmap(&self, uri: &str) -> Result<Option<RoadmapNode>>;

    /// List every roadmap
    async fn list_roadmaps(&self) -> Result<Vec<RoadmapNode>>;

    /// Count all roadmaps
    async fn count_roadmaps(&self) -> Result<usize>;

    /// Create or replace a roadmap
    async fn upsert_roadmap(&self, roadmap: &RoadmapNode) -> Result<()>;

    // ========================================================================
    // Comment operations
    // ========================================================================

    /// List the comments of a resource or roadmap joined with their authors,
    /// in insertion order
    async fn list_comments(
        &self,
        subject: CommentSubject,
        subject_uri: &str,
    ) -> Result<Vec<CommentWithAuthor>>;

    /// Insert a comment after the existing comments of its subject
    async fn create_comment(&self, comment: &CommentNode) -> Result<()>;

    // ========================================================================
    // User operations
    // ========================================================================

    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<Option<UserNode>>;

    /// Create or replace a user
    async fn upsert_user(&self, user: &UserNode) -> Result<()>;

    /// Return the stored user with `user.id`, creating it from `user` when absent
    async fn get_or_create_user(&self, user: &UserNode) -> Result<UserNode>;

    // ========================================================================
    // Health
    // ========================================================================

    /// Check connectivity to the backing store
    async fn health_check(&self) -> Result<bool>;
}
