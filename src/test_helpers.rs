//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating test objects with sensible defaults,
//! and helpers for building mock server state over an in-memory store.
#![allow(dead_code)]

use crate::api::handlers::{LibraryState, ServerState};
use crate::library::paths::DEFAULT_MAX_DEPTH;
use crate::library::{Identity, LibraryManager};
use crate::neo4j::mock::MockHierarchyStore;
use crate::neo4j::models::*;
use crate::AuthConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-chars!!";

// ============================================================================
// Mock state builders
// ============================================================================

/// Build server state over `store`.
///
/// Pass `Some(test_auth_config())` for routes that need to verify sessions.
pub fn mock_server_state(store: MockHierarchyStore, auth_config: Option<AuthConfig>) -> LibraryState {
    Arc::new(ServerState {
        library: Arc::new(LibraryManager::new(Arc::new(store), DEFAULT_MAX_DEPTH)),
        auth_config,
    })
}

/// Create a test AuthConfig using `TEST_JWT_SECRET`.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_secs: 3600,
    }
}

/// Generate a valid Bearer token string for test requests.
///
/// Returns the full header value: `"Bearer eyJ..."`, for a member named "Test User".
pub fn test_bearer_token() -> String {
    let token = crate::auth::jwt::encode_jwt(Uuid::new_v4(), "Test User", TEST_JWT_SECRET, 3600)
        .expect("test token encoding should succeed");
    format!("Bearer {}", token)
}

/// Store seeded with a small catalog:
///
/// ```text
/// computer-science
/// ├── programming
/// │   └── rust        (rust-book)
/// └── (sicp)
/// math
///
/// rust-roadmap
/// └── async-rust
/// ```
pub async fn seeded_library_store() -> MockHierarchyStore {
    MockHierarchyStore::new()
        .with_categories(vec![
            CategoryNode::root("computer-science", "Computer Science"),
            CategoryNode::child("programming", "Programming", "computer-science"),
            CategoryNode::child("rust", "Rust", "programming"),
            CategoryNode::root("math", "Mathematics"),
        ])
        .await
        .with_resource(test_resource("rust-book", "rust"))
        .await
        .with_resource(test_resource("sicp", "computer-science"))
        .await
        .with_roadmap(RoadmapNode::root("rust-roadmap", "Rust Roadmap"))
        .await
        .with_roadmap(RoadmapNode::child("async-rust", "Async Rust", "rust-roadmap"))
        .await
}

// ============================================================================
// Test data factories
// ============================================================================

/// Create a resource filed under `category_uri`
pub fn test_resource(uri: &str, category_uri: &str) -> ResourceNode {
    ResourceNode {
        uri: uri.to_string(),
        category_uri: category_uri.to_string(),
        name: format!("Resource {}", uri),
        description: None,
        link: format!("https://example.com/{}", uri),
    }
}

/// Create a member with a random id
pub fn test_user(name: &str) -> UserNode {
    UserNode {
        id: Uuid::new_v4(),
        name: name.to_string(),
        image: None,
        favorites: vec![],
        roadmaps: vec![],
    }
}

/// Create a caller identity with a random id
pub fn test_identity() -> Identity {
    Identity {
        user_id: Uuid::new_v4(),
        name: "Test User".to_string(),
    }
}

/// Create a resource comment on `resource_uri` posted `secs` seconds after the Unix epoch
pub fn comment_at(resource_uri: &str, content: &str, secs: i64) -> CommentNode {
    CommentNode {
        id: Uuid::new_v4(),
        content: content.to_string(),
        author_id: Uuid::new_v4(),
        subject: CommentSubject::Resource,
        subject_uri: resource_uri.to_string(),
        timestamp: DateTime::<Utc>::from_timestamp(secs, 0).expect("valid timestamp"),
    }
}
