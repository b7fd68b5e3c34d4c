//! Library view models

use super::comments::CommentView;
use crate::neo4j::models::{CategoryNode, ResourceNode, RoadmapNode};
use serde::Serialize;
use uuid::Uuid;

/// The authenticated caller of a write operation.
///
/// Built from session claims at the API boundary and handed to the library
/// explicitly; the library never reads session state on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub name: String,
}

/// A category together with its parent and direct children
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetails {
    #[serde(flatten)]
    pub category: CategoryNode,
    pub parent: Option<CategoryNode>,
    pub categories: Vec<CategoryNode>,
    pub resources: Vec<ResourceNode>,
}

/// A roadmap with its comment thread, newest first
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapDetails {
    #[serde(flatten)]
    pub roadmap: RoadmapNode,
    pub comments: Vec<CommentView>,
}

/// Every roadmap, for listing and static route generation
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapsMeta {
    pub roadmaps: Vec<RoadmapNode>,
}

/// Catalog size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibraryMeta {
    pub num_resources: usize,
    pub num_categories: usize,
}

/// Kind of a hierarchy entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Category,
    Resource,
    Roadmap,
}
