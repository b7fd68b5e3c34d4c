//! Category path resolution and level enumeration
//!
//! Two views of the same forest:
//! - [`PathResolver`] walks parent links in the store, one point lookup per
//!   step, to produce the root-first breadcrumb path of a single category.
//! - [`enumerate_levels`] / [`static_paths`] group an already-loaded set of
//!   categories (and resources) or roadmaps by depth, for static route
//!   generation.

use super::error::{HierarchyFault, LibraryError, LibraryResult};
use super::models::NodeKind;
use crate::neo4j::models::{CategoryNode, ResourceNode, RoadmapNode};
use crate::neo4j::HierarchyStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Default bound on the number of categories in one path
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ============================================================================
// Path walk
// ============================================================================

/// Resolves root-first category paths against the store.
///
/// Lookups are memoized for the lifetime of the resolver, so one resolver
/// should serve a single request.
pub struct PathResolver<'a> {
    store: &'a dyn HierarchyStore,
    max_depth: usize,
    memo: HashMap<String, Option<CategoryNode>>,
}

impl<'a> PathResolver<'a> {
    pub fn new(store: &'a dyn HierarchyStore, max_depth: usize) -> Self {
        Self {
            store,
            max_depth: max_depth.max(1),
            memo: HashMap::new(),
        }
    }

    async fn lookup(&mut self, uri: &str) -> anyhow::Result<Option<CategoryNode>> {
        if let Some(hit) = self.memo.get(uri) {
            return Ok(hit.clone());
        }
        let node = self.store.get_category(uri).await?;
        self.memo.insert(uri.to_string(), node.clone());
        Ok(node)
    }

    /// Return the URIs from the root down to `uri`, inclusive.
    ///
    /// Fails with `NotFound` when `uri` itself is unknown and with
    /// `BrokenHierarchy` when any ancestor is missing, a parent link loops,
    /// or the chain exceeds the configured depth. A partial path is never
    /// returned.
    pub async fn resolve_full_path(&mut self, uri: &str) -> LibraryResult<Vec<String>> {
        let start = self
            .lookup(uri)
            .await?
            .ok_or_else(|| LibraryError::NotFound(uri.to_string()))?;

        let mut seen = HashSet::from([start.uri.clone()]);
        let mut path = vec![start.uri];
        let mut parent = start.parent_uri;

        while let Some(parent_uri) = parent {
            if !seen.insert(parent_uri.clone()) {
                return Err(LibraryError::broken(uri, HierarchyFault::Cycle(parent_uri)));
            }
            if path.len() >= self.max_depth {
                return Err(LibraryError::broken(
                    uri,
                    HierarchyFault::TooDeep(self.max_depth),
                ));
            }

            let node = self.lookup(&parent_uri).await?.ok_or_else(|| {
                LibraryError::broken(uri, HierarchyFault::DanglingParent(parent_uri.clone()))
            })?;

            path.push(node.uri);
            parent = node.parent_uri;
        }

        path.reverse();
        Ok(path)
    }
}

// ============================================================================
// Level enumeration
// ============================================================================

/// Why a node was left out of every level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "parent", rename_all = "snake_case")]
pub enum OrphanReason {
    /// The referenced parent (or category, for a resource) is not in the set
    MissingParent(String),
    /// The parent exists but its own chain never reaches a root
    UnreachableAncestor(String),
}

/// A node excluded from enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanNode {
    pub uri: String,
    pub kind: NodeKind,
    #[serde(flatten)]
    pub reason: OrphanReason,
}

/// A node of a parent-linked forest
pub trait ForestNode: Clone {
    const KIND: NodeKind;

    fn uri(&self) -> &str;

    /// `None` for a root
    fn parent_uri(&self) -> Option<&str>;
}

impl ForestNode for CategoryNode {
    const KIND: NodeKind = NodeKind::Category;

    fn uri(&self) -> &str {
        &self.uri
    }

    fn parent_uri(&self) -> Option<&str> {
        self.parent_uri.as_deref()
    }
}

impl ForestNode for RoadmapNode {
    const KIND: NodeKind = NodeKind::Roadmap;

    fn uri(&self) -> &str {
        &self.uri
    }

    fn parent_uri(&self) -> Option<&str> {
        self.parent_uri.as_deref()
    }
}

/// Nodes grouped by depth, plus the nodes that could not be placed
#[derive(Debug, Clone, Serialize)]
pub struct LevelPartition<N> {
    pub levels: Vec<Vec<N>>,
    pub orphans: Vec<OrphanNode>,
}

/// Group nodes by depth: level 0 holds the roots, level k the nodes whose
/// parent sits in level k-1. Input order is kept within a level.
///
/// Nodes whose ancestor chain does not resolve inside `nodes` are
/// reported in `orphans` instead of failing the whole enumeration.
pub fn enumerate_levels<N: ForestNode>(nodes: &[N]) -> LevelPartition<N> {
    let known: HashSet<&str> = nodes.iter().map(|n| n.uri()).collect();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut levels: Vec<Vec<N>> = Vec::new();

    let mut frontier: HashSet<&str> = HashSet::new();
    let mut level = Vec::new();
    for node in nodes.iter().filter(|n| n.parent_uri().is_none()) {
        if placed.insert(node.uri()) {
            frontier.insert(node.uri());
            level.push(node.clone());
        }
    }

    while !level.is_empty() {
        levels.push(level);

        let mut next_frontier = HashSet::new();
        let mut next_level = Vec::new();
        for node in nodes {
            let Some(parent) = node.parent_uri() else {
                continue;
            };
            if frontier.contains(parent) && placed.insert(node.uri()) {
                next_frontier.insert(node.uri());
                next_level.push(node.clone());
            }
        }

        frontier = next_frontier;
        level = next_level;
    }

    let orphans = nodes
        .iter()
        .filter(|n| !placed.contains(n.uri()))
        .filter_map(|n| {
            let parent = n.parent_uri()?.to_string();
            let reason = if known.contains(parent.as_str()) {
                OrphanReason::UnreachableAncestor(parent)
            } else {
                OrphanReason::MissingParent(parent)
            };
            Some(OrphanNode {
                uri: n.uri().to_string(),
                kind: N::KIND,
                reason,
            })
        })
        .collect();

    LevelPartition { levels, orphans }
}

/// Nodes reordered so every placeable node comes after its parent.
///
/// Levels are flattened in order; orphans follow in input order.
pub fn parents_first<N: ForestNode>(nodes: &[N]) -> Vec<N> {
    let partition = enumerate_levels(nodes);
    let mut ordered: Vec<N> = partition.levels.into_iter().flatten().collect();
    let orphaned: HashSet<&str> = partition.orphans.iter().map(|o| o.uri.as_str()).collect();
    ordered.extend(
        nodes
            .iter()
            .filter(|n| orphaned.contains(n.uri()))
            .cloned(),
    );
    ordered
}

// ============================================================================
// Static paths
// ============================================================================

/// One routable page: the root-first URI segments leading to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticPath {
    pub uri: String,
    pub kind: NodeKind,
    pub segments: Vec<String>,
}

/// Every routable category and resource, grouped by depth
#[derive(Debug, Clone, Default, Serialize)]
pub struct StaticPaths {
    pub levels: Vec<Vec<StaticPath>>,
    pub orphans: Vec<OrphanNode>,
}

/// Flatten the forest into per-depth static paths.
///
/// Categories appear at their depth; a resource appears one level below its
/// category with the category path plus its own URI as segments.
pub fn static_paths(categories: &[CategoryNode], resources: &[ResourceNode]) -> StaticPaths {
    let partition = enumerate_levels(categories);
    let mut segments: HashMap<&str, Vec<String>> = HashMap::new();
    let mut levels: Vec<Vec<StaticPath>> = Vec::with_capacity(partition.levels.len() + 1);

    for level in &partition.levels {
        let mut paths = Vec::with_capacity(level.len());
        for category in level {
            let mut path = category
                .parent_uri
                .as_deref()
                .and_then(|p| segments.get(p))
                .cloned()
                .unwrap_or_default();
            path.push(category.uri.clone());
            segments.insert(category.uri.as_str(), path.clone());
            paths.push(StaticPath {
                uri: category.uri.clone(),
                kind: NodeKind::Category,
                segments: path,
            });
        }
        levels.push(paths);
    }

    let known: HashSet<&str> = categories.iter().map(|c| c.uri.as_str()).collect();
    let mut orphans = partition.orphans;

    for resource in resources {
        let Some(category_path) = segments.get(resource.category_uri.as_str()) else {
            let reason = if known.contains(resource.category_uri.as_str()) {
                OrphanReason::UnreachableAncestor(resource.category_uri.clone())
            } else {
                OrphanReason::MissingParent(resource.category_uri.clone())
            };
            orphans.push(OrphanNode {
                uri: resource.uri.clone(),
                kind: NodeKind::Resource,
                reason,
            });
            continue;
        };

        // category path length == category depth + 1 == resource level index
        let depth = category_path.len();
        if levels.len() <= depth {
            levels.resize_with(depth + 1, Vec::new);
        }
        let mut path = category_path.clone();
        path.push(resource.uri.clone());
        levels[depth].push(StaticPath {
            uri: resource.uri.clone(),
            kind: NodeKind::Resource,
            segments: path,
        });
    }

    StaticPaths { levels, orphans }
}
