//! In-memory mock implementation of HierarchyStore for testing.
//!
//! Provides a complete mock of all store operations using
//! `tokio::sync::RwLock<HashMap<K, V>>` collections.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::*;
use crate::neo4j::traits::HierarchyStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory mock implementation of HierarchyStore for testing.
pub struct MockHierarchyStore {
    // Entity stores
    pub categories: RwLock<HashMap<String, CategoryNode>>,
    pub resources: RwLock<HashMap<String, ResourceNode>>,
    pub roadmaps: RwLock<HashMap<String, RoadmapNode>>,
    pub users: RwLock<HashMap<Uuid, UserNode>>,

    // Relationships (insertion-ordered)
    pub comments: RwLock<HashMap<(CommentSubject, String), Vec<CommentNode>>>,

    /// Reported by `health_check`
    pub healthy: AtomicBool,
}

impl Default for MockHierarchyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHierarchyStore {
    /// Create a new empty MockHierarchyStore.
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(HashMap::new()),
            resources: RwLock::new(HashMap::new()),
            roadmaps: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            comments: RwLock::new(HashMap::new()),
            healthy: AtomicBool::new(true),
        }
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a category into the store.
    pub async fn with_category(self, category: CategoryNode) -> Self {
        self.categories
            .write()
            .await
            .insert(category.uri.clone(), category);
        self
    }

    /// Seed several categories into the store.
    pub async fn with_categories(self, categories: Vec<CategoryNode>) -> Self {
        {
            let mut map = self.categories.write().await;
            for category in categories {
                map.insert(category.uri.clone(), category);
            }
        }
        self
    }

    /// Seed a resource into the store.
    pub async fn with_resource(self, resource: ResourceNode) -> Self {
        self.resources
            .write()
            .await
            .insert(resource.uri.clone(), resource);
        self
    }

    /// Seed a roadmap into the store.
    pub async fn with_roadmap(self, roadmap: RoadmapNode) -> Self {
        self.roadmaps
            .write()
            .await
            .insert(roadmap.uri.clone(), roadmap);
        self
    }

    /// Seed a user into the store.
    pub async fn with_user(self, user: UserNode) -> Self {
        self.users.write().await.insert(user.id, user);
        self
    }

    /// Seed a comment, appended after the existing comments of its subject.
    pub async fn with_comment(self, comment: CommentNode) -> Self {
        self.comments
            .write()
            .await
            .entry((comment.subject, comment.subject_uri.clone()))
            .or_default()
            .push(comment);
        self
    }

    /// Make `health_check` report the store as down.
    pub fn unhealthy(self) -> Self {
        self.healthy.store(false, Ordering::SeqCst);
        self
    }
}

fn sorted_by_uri<T, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| key(a).cmp(key(b)));
    items
}

#[async_trait]
impl HierarchyStore for MockHierarchyStore {
    // ========================================================================
    // Category operations
    // ========================================================================

    async fn get_category(&self, uri: &str) -> Result<Option<CategoryNode>> {
        Ok(self.categories.read().await.get(uri).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryNode>> {
        let all = self.categories.read().await.values().cloned().collect();
        Ok(sorted_by_uri(all, |c: &CategoryNode| c.uri.as_str()))
    }

    async fn list_root_categories(&self) -> Result<Vec<CategoryNode>> {
        let roots = self
            .categories
            .read()
            .await
            .values()
            .filter(|c| c.parent_uri.is_none())
            .cloned()
            .collect();
        Ok(sorted_by_uri(roots, |c: &CategoryNode| c.uri.as_str()))
    }

    async fn list_child_categories(&self, parent_uri: &str) -> Result<Vec<CategoryNode>> {
        let children = self
            .categories
            .read()
            .await
            .values()
            .filter(|c| c.parent_uri.as_deref() == Some(parent_uri))
            .cloned()
            .collect();
        Ok(sorted_by_uri(children, |c: &CategoryNode| c.uri.as_str()))
    }

    async fn count_categories(&self) -> Result<usize> {
        Ok(self.categories.read().await.len())
    }

    async fn upsert_category(&self, category: &CategoryNode) -> Result<()> {
        self.categories
            .write()
            .await
            .insert(category.uri.clone(), category.clone());
        Ok(())
    }

    // ========================================================================
    // Resource operations
    // ========================================================================

    async fn get_resource(&self, uri: &str) -> Result<Option<ResourceNode>> {
        Ok(self.resources.read().await.get(uri).cloned())
    }

    async fn list_resources(&self) -> Result<Vec<ResourceNode>> {
        let all = self.resources.read().await.values().cloned().collect();
        Ok(sorted_by_uri(all, |r: &ResourceNode| r.uri.as_str()))
    }

    async fn list_category_resources(&self, category_uri: &str) -> Result<Vec<ResourceNode>> {
        let filed = self
            .resources
            .read()
            .await
            .values()
            .filter(|r| r.category_uri == category_uri)
            .cloned()
            .collect();
        Ok(sorted_by_uri(filed, |r: &ResourceNode| r.uri.as_str()))
    }

    async fn count_resources(&self) -> Result<usize> {
        Ok(self.resources.read().await.len())
    }

    async fn upsert_resource(&self, resource: &ResourceNode) -> Result<()> {
        self.resources
            .write()
            .await
            .insert(resource.uri.clone(), resource.clone());
        Ok(())
    }

    // ========================================================================
    // Roadmap operations
    // ========================================================================

    async fn get_roadmap(&self, uri: &str) -> Result<Option<RoadmapNode>> {
        Ok(self.roadmaps.read().await.get(uri).cloned())
    }

    async fn list_roadmaps(&self) -> Result<Vec<RoadmapNode>> {
        let all = self.roadmaps.read().await.values().cloned().collect();
        Ok(sorted_by_uri(all, |m: &RoadmapNode| m.uri.as_str()))
    }

    async fn count_roadmaps(&self) -> Result<usize> {
        Ok(self.roadmaps.read().await.len())
    }

    async fn upsert_roadmap(&self, roadmap: &RoadmapNode) -> Result<()> {
        self.roadmaps
            .write()
            .await
            .insert(roadmap.uri.clone(), roadmap.clone());
        Ok(())
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    async fn list_comments(
        &self,
        subject: CommentSubject,
        subject_uri: &str,
    ) -> Result<Vec<CommentWithAuthor>> {
        let comments = self
            .comments
            .read()
            .await
            .get(&(subject, subject_uri.to_string()))
            .cloned()
            .unwrap_or_default();
        let users = self.users.read().await;

        Ok(comments
            .into_iter()
            .map(|comment| CommentWithAuthor {
                author: users.get(&comment.author_id).cloned(),
                comment,
            })
            .collect())
    }

    async fn create_comment(&self, comment: &CommentNode) -> Result<()> {
        self.comments
            .write()
            .await
            .entry((comment.subject, comment.subject_uri.clone()))
            .or_default()
            .push(comment.clone());
        Ok(())
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn get_user(&self, id: Uuid) -> Result<Option<UserNode>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn upsert_user(&self, user: &UserNode) -> Result<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_or_create_user(&self, user: &UserNode) -> Result<UserNode> {
        Ok(self
            .users
            .write()
            .await
            .entry(user.id)
            .or_insert_with(|| user.clone())
            .clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_child_lookup_filters_by_parent() {
        let store = MockHierarchyStore::new()
            .with_categories(vec![
                CategoryNode::root("cs", "Computer Science"),
                CategoryNode::child("algorithms", "Algorithms", "cs"),
                CategoryNode::child("networks", "Networks", "cs"),
                CategoryNode::root("math", "Mathematics"),
            ])
            .await;

        let children = store.list_child_categories("cs").await.unwrap();
        let uris: Vec<_> = children.iter().map(|c| c.uri.as_str()).collect();
        assert_eq!(uris, vec!["algorithms", "networks"]);

        let roots = store.list_root_categories().await.unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(store.count_categories().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_comments_keep_insertion_order() {
        let author = Uuid::new_v4();
        let now = chrono::Utc::now();
        let store = MockHierarchyStore::new();

        for content in ["first", "second", "third"] {
            store
                .create_comment(&CommentNode {
                    id: Uuid::new_v4(),
                    content: content.to_string(),
                    author_id: author,
                    subject: CommentSubject::Resource,
                    subject_uri: "rust-book".to_string(),
                    timestamp: now,
                })
                .await
                .unwrap();
        }

        let comments = store
            .list_comments(CommentSubject::Resource, "rust-book")
            .await
            .unwrap();
        let contents: Vec<_> = comments
            .iter()
            .map(|c| c.comment.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert!(comments.iter().all(|c| c.author.is_none()));
    }

    #[tokio::test]
    async fn test_threads_are_separated_by_subject() {
        let author = Uuid::new_v4();
        let store = MockHierarchyStore::new();

        for (subject, content) in [
            (CommentSubject::Resource, "on the resource"),
            (CommentSubject::Roadmap, "on the roadmap"),
        ] {
            store
                .create_comment(&CommentNode {
                    id: Uuid::new_v4(),
                    content: content.to_string(),
                    author_id: author,
                    subject,
                    subject_uri: "rust".to_string(),
                    timestamp: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }

        let thread = store
            .list_comments(CommentSubject::Roadmap, "rust")
            .await
            .unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].comment.content, "on the roadmap");
    }

    #[tokio::test]
    async fn test_get_or_create_user_keeps_existing_record() {
        let mut existing = crate::test_helpers::test_user("Ada");
        existing.image = Some("https://example.com/ada.png".to_string());
        let store = MockHierarchyStore::new().with_user(existing.clone()).await;

        let mut incoming = existing.clone();
        incoming.name = "Renamed".to_string();
        assert_eq!(store.get_or_create_user(&incoming).await.unwrap(), existing);

        let fresh = crate::test_helpers::test_user("Grace");
        assert_eq!(store.get_or_create_user(&fresh).await.unwrap(), fresh);
        assert_eq!(store.users.read().await.len(), 2);
    }
}
