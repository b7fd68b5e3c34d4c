//! Library domain: category hierarchy, resources and comment threads
//!
//! - [`paths`]: breadcrumb path resolution and per-depth enumeration
//! - [`comments`]: newest-first comment threads on resources and roadmaps
//! - [`manager`]: the operations the API calls

pub mod comments;
pub mod error;
pub mod manager;
pub mod models;
pub mod paths;

pub use comments::{AuthorView, CommentProjector, CommentView};
pub use error::{HierarchyFault, LibraryError, LibraryResult};
pub use manager::LibraryManager;
pub use models::*;
pub use paths::{
    enumerate_levels, parents_first, static_paths, ForestNode, LevelPartition, PathResolver,
    StaticPaths,
};
