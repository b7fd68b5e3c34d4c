//! Neo4j graph models for the library hierarchy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Hierarchy nodes
// ============================================================================

/// A node of the category forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` for a root category
    #[serde(default)]
    pub parent_uri: Option<String>,
}

impl CategoryNode {
    /// Create a root category
    pub fn root(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            parent_uri: None,
        }
    }

    /// Create a category nested under `parent_uri`
    pub fn child(
        uri: impl Into<String>,
        name: impl Into<String>,
        parent_uri: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            parent_uri: Some(parent_uri.into()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_uri.is_none()
    }
}

/// A leaf content item (external link) filed under exactly one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub uri: String,
    pub category_uri: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub link: String,
}

/// A learning roadmap. Roadmaps form their own forest, separate from categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapNode {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Roadmap diagram
    #[serde(default)]
    pub image: Option<String>,
    /// `None` for a top-level roadmap
    #[serde(default)]
    pub parent_uri: Option<String>,
}

impl RoadmapNode {
    /// Create a top-level roadmap
    pub fn root(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            image: None,
            parent_uri: None,
        }
    }

    /// Create a roadmap nested under `parent_uri`
    pub fn child(
        uri: impl Into<String>,
        name: impl Into<String>,
        parent_uri: impl Into<String>,
    ) -> Self {
        Self {
            parent_uri: Some(parent_uri.into()),
            ..Self::root(uri, name)
        }
    }
}

// ============================================================================
// Comments & users
// ============================================================================

/// What a comment thread hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSubject {
    Resource,
    Roadmap,
}

impl CommentSubject {
    /// Graph label of the subject node
    pub fn label(self) -> &'static str {
        match self {
            CommentSubject::Resource => "Resource",
            CommentSubject::Roadmap => "Roadmap",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommentSubject::Resource => "resource",
            CommentSubject::Roadmap => "roadmap",
        }
    }
}

impl std::str::FromStr for CommentSubject {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resource" => Ok(CommentSubject::Resource),
            "roadmap" => Ok(CommentSubject::Roadmap),
            other => Err(anyhow::anyhow!("Unknown comment subject '{}'", other)),
        }
    }
}

/// An immutable comment attached to a resource or a roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub subject: CommentSubject,
    pub subject_uri: String,
    pub timestamp: DateTime<Utc>,
}

/// A library member. Only read here, to join comment authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNode {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Favorited resource URIs
    #[serde(default)]
    pub favorites: Vec<String>,
    /// Favorited roadmap URIs
    #[serde(default)]
    pub roadmaps: Vec<String>,
}

/// A comment joined with its author, in store order
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: CommentNode,
    /// `None` when the author record no longer exists
    pub author: Option<UserNode>,
}
