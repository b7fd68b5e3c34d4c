//! Neo4j client and models for the library hierarchy

pub mod client;
mod impl_hierarchy_store;
pub mod models;
pub mod traits;

pub use client::Neo4jClient;
pub use models::*;
pub use traits::HierarchyStore;

#[cfg(test)]
pub(crate) mod mock;
