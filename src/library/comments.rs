//! Comment thread projection for resources and roadmaps

use super::error::{LibraryError, LibraryResult};
use super::models::Identity;
use crate::neo4j::models::{CommentNode, CommentSubject, CommentWithAuthor, UserNode};
use crate::neo4j::HierarchyStore;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Display name used when a comment's author record is gone
pub const DELETED_AUTHOR_NAME: &str = "[deleted]";

/// Public part of a comment's author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

impl From<&UserNode> for AuthorView {
    fn from(user: &UserNode) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// A comment as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    /// ISO-8601, UTC, millisecond precision (`2024-01-02T03:04:05.000Z`)
    pub timestamp: String,
    pub author: AuthorView,
}

/// Canonical text form of a comment timestamp. Sorts lexically.
pub fn iso_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Order a thread newest-first. Comments sharing a timestamp keep their
/// store order.
pub fn order_newest_first(mut thread: Vec<CommentWithAuthor>) -> Vec<CommentWithAuthor> {
    // sort_by is stable
    thread.sort_by(|a, b| b.comment.timestamp.cmp(&a.comment.timestamp));
    thread
}

fn to_view(entry: CommentWithAuthor) -> CommentView {
    let author = match entry.author {
        Some(ref user) => AuthorView::from(user),
        None => {
            tracing::warn!(
                comment_id = %entry.comment.id,
                author_id = %entry.comment.author_id,
                "Comment author no longer exists"
            );
            AuthorView {
                id: entry.comment.author_id,
                name: DELETED_AUTHOR_NAME.to_string(),
                image: None,
            }
        }
    };

    CommentView {
        id: entry.comment.id,
        timestamp: iso_timestamp(&entry.comment.timestamp),
        content: entry.comment.content,
        author,
    }
}

/// Reads and appends the comment threads of resources and roadmaps
pub struct CommentProjector<'a> {
    store: &'a dyn HierarchyStore,
}

impl<'a> CommentProjector<'a> {
    pub fn new(store: &'a dyn HierarchyStore) -> Self {
        Self { store }
    }

    async fn require_subject(&self, subject: CommentSubject, uri: &str) -> LibraryResult<()> {
        let exists = match subject {
            CommentSubject::Resource => self.store.get_resource(uri).await?.is_some(),
            CommentSubject::Roadmap => self.store.get_roadmap(uri).await?.is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(LibraryError::NotFound(uri.to_string()))
        }
    }

    /// Comments of a resource, newest first, with ISO timestamps
    pub async fn project_comments(&self, resource_uri: &str) -> LibraryResult<Vec<CommentView>> {
        self.project_thread(CommentSubject::Resource, resource_uri)
            .await
    }

    /// Comments of any subject, newest first, with ISO timestamps
    pub async fn project_thread(
        &self,
        subject: CommentSubject,
        subject_uri: &str,
    ) -> LibraryResult<Vec<CommentView>> {
        self.require_subject(subject, subject_uri).await?;

        let thread = self.store.list_comments(subject, subject_uri).await?;
        Ok(order_newest_first(thread)
            .into_iter()
            .map(to_view)
            .collect())
    }

    /// Append a comment to a resource on behalf of `identity`
    pub async fn append_comment(
        &self,
        resource_uri: &str,
        identity: Option<&Identity>,
        content: &str,
    ) -> LibraryResult<CommentView> {
        self.append_to_thread(CommentSubject::Resource, resource_uri, identity, content)
            .await
    }

    /// Append a comment to any subject on behalf of `identity`.
    ///
    /// Checks, in order: identity present, content non-blank, subject exists.
    /// The stored content is trimmed. A member without a user record gets one
    /// built from the identity, so the returned view matches what later
    /// projections show.
    pub async fn append_to_thread(
        &self,
        subject: CommentSubject,
        subject_uri: &str,
        identity: Option<&Identity>,
        content: &str,
    ) -> LibraryResult<CommentView> {
        let identity = identity.ok_or(LibraryError::Unauthenticated)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(LibraryError::InvalidContent);
        }

        self.require_subject(subject, subject_uri).await?;

        let author = self
            .store
            .get_or_create_user(&UserNode {
                id: identity.user_id,
                name: identity.name.clone(),
                image: None,
                favorites: vec![],
                roadmaps: vec![],
            })
            .await?;

        let comment = CommentNode {
            id: Uuid::new_v4(),
            content: content.to_string(),
            author_id: identity.user_id,
            subject,
            subject_uri: subject_uri.to_string(),
            timestamp: Utc::now(),
        };
        self.store.create_comment(&comment).await?;

        tracing::info!(
            comment_id = %comment.id,
            subject = subject.as_str(),
            uri = %subject_uri,
            author_id = %identity.user_id,
            "Comment created"
        );

        Ok(to_view(CommentWithAuthor {
            comment,
            author: Some(author),
        }))
    }
}
