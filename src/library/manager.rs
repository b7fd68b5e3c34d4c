//! Library operations exposed to the API

use super::comments::{CommentProjector, CommentView};
use super::error::{LibraryError, LibraryResult};
use super::models::*;
use super::paths::{self, LevelPartition, PathResolver, StaticPaths};
use crate::neo4j::models::{CategoryNode, CommentSubject, ResourceNode, RoadmapNode};
use crate::neo4j::HierarchyStore;
use std::sync::Arc;

/// Manager for library operations
pub struct LibraryManager {
    store: Arc<dyn HierarchyStore>,
    max_depth: usize,
}

impl LibraryManager {
    /// Create a new library manager
    pub fn new(store: Arc<dyn HierarchyStore>, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn HierarchyStore> {
        &self.store
    }

    // ========================================================================
    // Category operations
    // ========================================================================

    /// Get a category with its parent and direct children
    pub async fn get_category(&self, uri: &str) -> LibraryResult<CategoryDetails> {
        let category = self
            .store
            .get_category(uri)
            .await?
            .ok_or_else(|| LibraryError::NotFound(uri.to_string()))?;

        let parent = match category.parent_uri {
            Some(ref parent_uri) => {
                let parent = self.store.get_category(parent_uri).await?;
                if parent.is_none() {
                    tracing::warn!(
                        category = %uri,
                        parent = %parent_uri,
                        "Category references a missing parent"
                    );
                }
                parent
            }
            None => None,
        };

        let (categories, resources) = tokio::try_join!(
            self.store.list_child_categories(uri),
            self.store.list_category_resources(uri),
        )?;

        Ok(CategoryDetails {
            category,
            parent,
            categories,
            resources,
        })
    }

    /// Whether `uri` names a category
    pub async fn is_category(&self, uri: &str) -> LibraryResult<bool> {
        Ok(self.store.get_category(uri).await?.is_some())
    }

    /// List every category
    pub async fn list_categories(&self) -> LibraryResult<Vec<CategoryNode>> {
        Ok(self.store.list_categories().await?)
    }

    /// List root categories
    pub async fn list_root_categories(&self) -> LibraryResult<Vec<CategoryNode>> {
        Ok(self.store.list_root_categories().await?)
    }

    /// Root-first URIs from the forest root down to `uri`
    pub async fn full_path(&self, uri: &str) -> LibraryResult<Vec<String>> {
        let mut resolver = PathResolver::new(self.store.as_ref(), self.max_depth);
        let result = resolver.resolve_full_path(uri).await;

        if let Err(LibraryError::BrokenHierarchy {
            uri: ref start,
            ref fault,
        }) = result
        {
            tracing::warn!(category = %start, %fault, "Data integrity: broken category hierarchy");
        }

        result
    }

    /// Every routable category and resource, grouped by depth
    pub async fn static_paths(&self) -> LibraryResult<StaticPaths> {
        let (categories, resources) = tokio::try_join!(
            self.store.list_categories(),
            self.store.list_resources(),
        )?;

        let static_paths = paths::static_paths(&categories, &resources);
        for orphan in &static_paths.orphans {
            tracing::warn!(
                uri = %orphan.uri,
                kind = ?orphan.kind,
                reason = ?orphan.reason,
                "Data integrity: node excluded from static paths"
            );
        }

        Ok(static_paths)
    }

    // ========================================================================
    // Resource operations
    // ========================================================================

    /// Get a resource by URI
    pub async fn get_resource(&self, uri: &str) -> LibraryResult<ResourceNode> {
        self.store
            .get_resource(uri)
            .await?
            .ok_or_else(|| LibraryError::NotFound(uri.to_string()))
    }

    /// List every resource
    pub async fn list_resources(&self) -> LibraryResult<Vec<ResourceNode>> {
        Ok(self.store.list_resources().await?)
    }

    /// Category and resource counts
    pub async fn meta(&self) -> LibraryResult<LibraryMeta> {
        let (num_resources, num_categories) = tokio::try_join!(
            self.store.count_resources(),
            self.store.count_categories(),
        )?;

        Ok(LibraryMeta {
            num_resources,
            num_categories,
        })
    }

    // ========================================================================
    // Roadmap operations
    // ========================================================================

    /// Every roadmap
    pub async fn roadmaps_meta(&self) -> LibraryResult<RoadmapsMeta> {
        Ok(RoadmapsMeta {
            roadmaps: self.store.list_roadmaps().await?,
        })
    }

    /// Roadmaps grouped by depth for static route generation
    pub async fn roadmap_levels(&self) -> LibraryResult<LevelPartition<RoadmapNode>> {
        let roadmaps = self.store.list_roadmaps().await?;
        let partition = paths::enumerate_levels(&roadmaps);

        for orphan in &partition.orphans {
            tracing::warn!(
                uri = %orphan.uri,
                reason = ?orphan.reason,
                "Data integrity: roadmap excluded from static paths"
            );
        }

        Ok(partition)
    }

    /// Get a roadmap with its comment thread
    pub async fn get_roadmap(&self, uri: &str) -> LibraryResult<RoadmapDetails> {
        let roadmap = self
            .store
            .get_roadmap(uri)
            .await?
            .ok_or_else(|| LibraryError::NotFound(uri.to_string()))?;

        let comments = CommentProjector::new(self.store.as_ref())
            .project_thread(CommentSubject::Roadmap, uri)
            .await?;

        Ok(RoadmapDetails { roadmap, comments })
    }

    /// Append a comment to a roadmap
    pub async fn add_roadmap_comment(
        &self,
        roadmap_uri: &str,
        identity: Option<&Identity>,
        content: &str,
    ) -> LibraryResult<CommentView> {
        CommentProjector::new(self.store.as_ref())
            .append_to_thread(CommentSubject::Roadmap, roadmap_uri, identity, content)
            .await
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    /// Comments of a resource, newest first
    pub async fn comments(&self, resource_uri: &str) -> LibraryResult<Vec<CommentView>> {
        CommentProjector::new(self.store.as_ref())
            .project_comments(resource_uri)
            .await
    }

    /// Append a comment to a resource
    pub async fn add_comment(
        &self,
        resource_uri: &str,
        identity: Option<&Identity>,
        content: &str,
    ) -> LibraryResult<CommentView> {
        CommentProjector::new(self.store.as_ref())
            .append_comment(resource_uri, identity, content)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::paths::DEFAULT_MAX_DEPTH;
    use crate::neo4j::mock::MockHierarchyStore;
    use crate::test_helpers::{seeded_library_store, test_identity};

    async fn manager() -> LibraryManager {
        LibraryManager::new(Arc::new(seeded_library_store().await), DEFAULT_MAX_DEPTH)
    }

    #[tokio::test]
    async fn test_get_category_details() {
        let manager = manager().await;
        let details = manager.get_category("programming").await.unwrap();

        assert_eq!(details.category.uri, "programming");
        assert_eq!(details.parent.unwrap().uri, "computer-science");
        assert_eq!(details.categories.len(), 1);
        assert_eq!(details.categories[0].uri, "rust");
        assert!(details.resources.is_empty());

        let err = manager.get_category("nope").await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_meta_counts() {
        let meta = manager().await.meta().await.unwrap();
        assert_eq!(
            meta,
            LibraryMeta {
                num_resources: 2,
                num_categories: 4,
            }
        );
    }

    #[tokio::test]
    async fn test_is_category() {
        let manager = manager().await;
        assert!(manager.is_category("rust").await.unwrap());
        assert!(!manager.is_category("rust-book").await.unwrap());
    }

    #[tokio::test]
    async fn test_full_path_and_static_paths() {
        let manager = manager().await;
        assert_eq!(
            manager.full_path("rust").await.unwrap(),
            vec!["computer-science", "programming", "rust"]
        );

        let paths = manager.static_paths().await.unwrap();
        assert_eq!(paths.levels.len(), 4);
        assert!(paths.orphans.is_empty());
        assert_eq!(
            paths.levels[3][0].segments,
            vec!["computer-science", "programming", "rust", "rust-book"]
        );
    }

    #[tokio::test]
    async fn test_empty_store() {
        let manager = LibraryManager::new(Arc::new(MockHierarchyStore::new()), DEFAULT_MAX_DEPTH);
        let paths = manager.static_paths().await.unwrap();
        assert!(paths.levels.is_empty());
        assert!(manager.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_roundtrip() {
        let manager = manager().await;
        let identity = test_identity();

        manager
            .add_comment("rust-book", Some(&identity), "Great read")
            .await
            .unwrap();
        let comments = manager.comments("rust-book").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "Great read");
    }

    #[tokio::test]
    async fn test_roadmap_details_and_levels() {
        let manager = manager().await;

        let meta = manager.roadmaps_meta().await.unwrap();
        assert_eq!(meta.roadmaps.len(), 2);

        let levels = manager.roadmap_levels().await.unwrap();
        assert_eq!(levels.levels.len(), 2);
        assert_eq!(levels.levels[1][0].uri, "async-rust");

        let identity = test_identity();
        let created = manager
            .add_roadmap_comment("async-rust", Some(&identity), "Start with tokio")
            .await
            .unwrap();
        let details = manager.get_roadmap("async-rust").await.unwrap();
        assert_eq!(details.roadmap.parent_uri.as_deref(), Some("rust-roadmap"));
        assert_eq!(details.comments, vec![created]);

        let err = manager.get_roadmap("nope").await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(_)));
        let err = manager
            .add_roadmap_comment("async-rust", None, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::Unauthenticated));
    }
}
