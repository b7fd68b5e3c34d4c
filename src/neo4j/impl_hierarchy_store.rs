//! `HierarchyStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;
use uuid::Uuid;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::HierarchyStore;

#[async_trait]
impl HierarchyStore for Neo4jClient {
    // ========================================================================
    // Category operations
    // ========================================================================

    async fn get_category(&self, uri: &str) -> anyhow::Result<Option<CategoryNode>> {
        self.get_category(uri).await
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<CategoryNode>> {
        self.list_categories().await
    }

    async fn list_root_categories(&self) -> anyhow::Result<Vec<CategoryNode>> {
        self.list_root_categories().await
    }

    async fn list_child_categories(&self, parent_uri: &str) -> anyhow::Result<Vec<CategoryNode>> {
        self.list_child_categories(parent_uri).await
    }

    async fn count_categories(&self) -> anyhow::Result<usize> {
        self.count_categories().await
    }

    async fn upsert_category(&self, category: &CategoryNode) -> anyhow::Result<()> {
        self.upsert_category(category).await
    }

    // ========================================================================
    // Resource operations
    // ========================================================================

    async fn get_resource(&self, uri: &str) -> anyhow::Result<Option<ResourceNode>> {
        self.get_resource(uri).await
    }

    async fn list_resources(&self) -> anyhow::Result<Vec<ResourceNode>> {
        self.list_resources().await
    }

    async fn list_category_resources(
        &self,
        category_uri: &str,
    ) -> anyhow::Result<Vec<ResourceNode>> {
        self.list_category_resources(category_uri).await
    }

    async fn count_resources(&self) -> anyhow::Result<usize> {
        self.count_resources().await
    }

    async fn upsert_resource(&self, resource: &ResourceNode) -> anyhow::Result<()> {
        self.upsert_resource(resource).await
    }

    // ========================================================================
    // Roadmap operations
    // ========================================================================

    async fn get_roadmap(&self, uri: &str) -> anyhow::Result<Option<RoadmapNode>> {
        self.get_roadmap(uri).await
    }

    async fn list_roadmaps(&self) -> anyhow::Result<Vec<RoadmapNode>> {
        self.list_roadmaps().await
    }

    async fn count_roadmaps(&self) -> anyhow::Result<usize> {
        self.count_roadmaps().await
    }

    async fn upsert_roadmap(&self, roadmap: &RoadmapNode) -> anyhow::Result<()> {
        self.upsert_roadmap(roadmap).await
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    async fn list_comments(
        &self,
        subject: CommentSubject,
        subject_uri: &str,
    ) -> anyhow::Result<Vec<CommentWithAuthor>> {
        self.list_comments(subject, subject_uri).await
    }

    async fn create_comment(&self, comment: &CommentNode) -> anyhow::Result<()> {
        self.create_comment(comment).await
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<UserNode>> {
        self.get_user(id).await
    }

    async fn upsert_user(&self, user: &UserNode) -> anyhow::Result<()> {
        self.upsert_user(user).await
    }

    async fn get_or_create_user(&self, user: &UserNode) -> anyhow::Result<UserNode> {
        self.get_or_create_user(user).await
    }

    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }
}
