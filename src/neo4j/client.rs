//! Neo4j client for the library hierarchy
//!
//! Graph layout:
//! - `(:Category {uri, name, description, parent_uri})`
//! - `(:Resource {uri, category_uri, name, description, link})`
//! - `(:Roadmap {uri, name, description, image, parent_uri})`
//! - `(:Comment {id, content, author_id, subject, subject_uri, timestamp, seq})`
//! - `(:User {id, name, image, favorites, roadmaps})`
//!
//! `parent_uri` / `category_uri` are kept as plain properties so a dangling
//! reference stays observable; `CHILD_OF`, `FILED_UNDER` and `HAS_COMMENT`
//! relationships mirror them for traversal. Resources and roadmaps carry a
//! `comment_seq` counter that orders their comment threads.

use super::models::*;
use anyhow::{Context, Result};
use neo4rs::{query, Graph};
use std::sync::Arc;
use uuid::Uuid;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
        };

        // Initialize schema
        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT category_uri IF NOT EXISTS FOR (c:Category) REQUIRE c.uri IS UNIQUE",
            "CREATE CONSTRAINT resource_uri IF NOT EXISTS FOR (r:Resource) REQUIRE r.uri IS UNIQUE",
            "CREATE CONSTRAINT comment_id IF NOT EXISTS FOR (c:Comment) REQUIRE c.id IS UNIQUE",
            "CREATE CONSTRAINT user_id IF NOT EXISTS FOR (u:User) REQUIRE u.id IS UNIQUE",
            "CREATE CONSTRAINT roadmap_uri IF NOT EXISTS FOR (m:Roadmap) REQUIRE m.uri IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX category_parent IF NOT EXISTS FOR (c:Category) ON (c.parent_uri)",
            "CREATE INDEX resource_category IF NOT EXISTS FOR (r:Resource) ON (r.category_uri)",
            "CREATE INDEX roadmap_parent IF NOT EXISTS FOR (m:Roadmap) ON (m.parent_uri)",
            "CREATE INDEX comment_subject IF NOT EXISTS FOR (c:Comment) ON (c.subject, c.subject_uri)",
        ];

        for statement in constraints.into_iter().chain(indexes) {
            if let Err(e) = self.graph.run(query(statement)).await {
                tracing::warn!("Schema statement failed (may already exist): {}", e);
            }
        }

        Ok(())
    }

    /// Check that the database answers a trivial query
    pub async fn health_check(&self) -> Result<bool> {
        let mut result = self.graph.execute(query("RETURN 1 AS ok")).await?;
        Ok(result.next().await?.is_some())
    }

    // ========================================================================
    // Category operations
    // ========================================================================

    /// Get a category by URI
    pub async fn get_category(&self, uri: &str) -> Result<Option<CategoryNode>> {
        let q = query(
            r#"
            MATCH (c:Category {uri: $uri})
            RETURN c
            "#,
        )
        .param("uri", uri);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("c")?;
            Ok(Some(Self::node_to_category(&node)?))
        } else {
            Ok(None)
        }
    }

    /// List every category, ordered by URI
    pub async fn list_categories(&self) -> Result<Vec<CategoryNode>> {
        self.collect_categories(query(
            r#"
            MATCH (c:Category)
            RETURN c
            ORDER BY c.uri
            "#,
        ))
        .await
    }

    /// List root categories
    pub async fn list_root_categories(&self) -> Result<Vec<CategoryNode>> {
        self.collect_categories(query(
            r#"
            MATCH (c:Category)
            WHERE c.parent_uri IS NULL
            RETURN c
            ORDER BY c.uri
            "#,
        ))
        .await
    }

    /// List the direct children of a category
    pub async fn list_child_categories(&self, parent_uri: &str) -> Result<Vec<CategoryNode>> {
        self.collect_categories(
            query(
                r#"
                MATCH (c:Category {parent_uri: $parent_uri})
                RETURN c
                ORDER BY c.uri
                "#,
            )
            .param("parent_uri", parent_uri),
        )
        .await
    }

    /// Count all categories
    pub async fn count_categories(&self) -> Result<usize> {
        self.count(query("MATCH (c:Category) RETURN count(c) AS count"))
            .await
    }

    /// Create or replace a category and (re)link it to its parent
    pub async fn upsert_category(&self, category: &CategoryNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (c:Category {uri: $uri})
            SET c.name = $name,
                c.description = CASE WHEN $description = '' THEN null ELSE $description END,
                c.parent_uri = CASE WHEN $parent_uri = '' THEN null ELSE $parent_uri END
            WITH c
            OPTIONAL MATCH (c)-[old:CHILD_OF]->(:Category)
            DELETE old
            "#,
        )
        .param("uri", category.uri.clone())
        .param("name", category.name.clone())
        .param(
            "description",
            category.description.clone().unwrap_or_default(),
        )
        .param("parent_uri", category.parent_uri.clone().unwrap_or_default());

        self.graph.run(q).await?;

        if let Some(ref parent_uri) = category.parent_uri {
            let q = query(
                r#"
                MATCH (c:Category {uri: $uri})
                MATCH (p:Category {uri: $parent_uri})
                MERGE (c)-[:CHILD_OF]->(p)
                "#,
            )
            .param("uri", category.uri.clone())
            .param("parent_uri", parent_uri.clone());

            self.graph.run(q).await?;
        }

        // Children imported before this category
        let q = query(
            r#"
            MATCH (p:Category {uri: $uri})
            MATCH (c:Category {parent_uri: $uri})
            MERGE (c)-[:CHILD_OF]->(p)
            "#,
        )
        .param("uri", category.uri.clone());
        self.graph.run(q).await?;

        Ok(())
    }

    async fn collect_categories(&self, q: neo4rs::Query) -> Result<Vec<CategoryNode>> {
        let mut result = self.graph.execute(q).await?;
        let mut categories = Vec::new();

        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("c")?;
            categories.push(Self::node_to_category(&node)?);
        }

        Ok(categories)
    }

    fn node_to_category(node: &neo4rs::Node) -> Result<CategoryNode> {
        Ok(CategoryNode {
            uri: node
                .get("uri")
                .context("Category node without uri")?,
            name: node.get("name").context("Category node without name")?,
            description: node.get("description").ok(),
            parent_uri: node
                .get::<String>("parent_uri")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }

    // ========================================================================
    // Resource operations
    // ========================================================================

    /// Get a resource by URI
    pub async fn get_resource(&self, uri: &str) -> Result<Option<ResourceNode>> {
        let q = query(
            r#"
            MATCH (r:Resource {uri: $uri})
            RETURN r
            "#,
        )
        .param("uri", uri);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("r")?;
            Ok(Some(Self::node_to_resource(&node)?))
        } else {
            Ok(None)
        }
    }

    /// List every resource, ordered by URI
    pub async fn list_resources(&self) -> Result<Vec<ResourceNode>> {
        self.collect_resources(query(
            r#"
            MATCH (r:Resource)
            RETURN r
            ORDER BY r.uri
            "#,
        ))
        .await
    }

    /// List resources filed under a category
    pub async fn list_category_resources(&self, category_uri: &str) -> Result<Vec<ResourceNode>> {
        self.collect_resources(
            query(
                r#"
                MATCH (r:Resource {category_uri: $category_uri})
                RETURN r
                ORDER BY r.uri
                "#,
            )
            .param("category_uri", category_uri),
        )
        .await
    }

    /// Count all resources
    pub async fn count_resources(&self) -> Result<usize> {
        self.count(query("MATCH (r:Resource) RETURN count(r) AS count"))
            .await
    }

    /// Create or replace a resource and (re)link it to its category
    pub async fn upsert_resource(&self, resource: &ResourceNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (r:Resource {uri: $uri})
            SET r.category_uri = $category_uri,
                r.name = $name,
                r.description = CASE WHEN $description = '' THEN null ELSE $description END,
                r.link = $link
            WITH r
            OPTIONAL MATCH (r)-[old:FILED_UNDER]->(:Category)
            DELETE old
            WITH r
            MATCH (c:Category {uri: $category_uri})
            MERGE (r)-[:FILED_UNDER]->(c)
            "#,
        )
        .param("uri", resource.uri.clone())
        .param("category_uri", resource.category_uri.clone())
        .param("name", resource.name.clone())
        .param(
            "description",
            resource.description.clone().unwrap_or_default(),
        )
        .param("link", resource.link.clone());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn collect_resources(&self, q: neo4rs::Query) -> Result<Vec<ResourceNode>> {
        let mut result = self.graph.execute(q).await?;
        let mut resources = Vec::new();

        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("r")?;
            resources.push(Self::node_to_resource(&node)?);
        }

        Ok(resources)
    }

    fn node_to_resource(node: &neo4rs::Node) -> Result<ResourceNode> {
        Ok(ResourceNode {
            uri: node.get("uri").context("Resource node without uri")?,
            category_uri: node
                .get("category_uri")
                .context("Resource node without category_uri")?,
            name: node.get("name").context("Resource node without name")?,
            description: node.get("description").ok(),
            link: node.get("link").context("Resource node without link")?,
        })
    }

    // ========================================================================
    // Roadmap operations
    // ========================================================================

    /// Get a roadmap by URI
    pub async fn get_roadmap(&self, uri: &str) -> Result<Option<RoadmapNode>> {
        let q = query(
            r#"
            MATCH (m:Roadmap {uri: $uri})
            RETURN m
            "#,
        )
        .param("uri", uri);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("m")?;
            Ok(Some(Self::node_to_roadmap(&node)?))
        } else {
            Ok(None)
        }
    }

    /// List every roadmap, ordered by URI
    pub async fn list_roadmaps(&self) -> Result<Vec<RoadmapNode>> {
        let q = query(
            r#"
            MATCH (m:Roadmap)
            RETURN m
            ORDER BY m.uri
            "#,
        );

        let mut result = self.graph.execute(q).await?;
        let mut roadmaps = Vec::new();

        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("m")?;
            roadmaps.push(Self::node_to_roadmap(&node)?);
        }

        Ok(roadmaps)
    }

    /// Count all roadmaps
    pub async fn count_roadmaps(&self) -> Result<usize> {
        self.count(query("MATCH (m:Roadmap) RETURN count(m) AS count"))
            .await
    }

    /// Create or replace a roadmap and (re)link it to its parent
    pub async fn upsert_roadmap(&self, roadmap: &RoadmapNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (m:Roadmap {uri: $uri})
            SET m.name = $name,
                m.description = CASE WHEN $description = '' THEN null ELSE $description END,
                m.image = CASE WHEN $image = '' THEN null ELSE $image END,
                m.parent_uri = CASE WHEN $parent_uri = '' THEN null ELSE $parent_uri END
            WITH m
            OPTIONAL MATCH (m)-[old:CHILD_OF]->(:Roadmap)
            DELETE old
            WITH m
            OPTIONAL MATCH (p:Roadmap {uri: $parent_uri})
            FOREACH (_ IN CASE WHEN p IS NULL THEN [] ELSE [1] END |
                MERGE (m)-[:CHILD_OF]->(p))
            WITH m
            OPTIONAL MATCH (child:Roadmap {parent_uri: $uri})
            FOREACH (_ IN CASE WHEN child IS NULL THEN [] ELSE [1] END |
                MERGE (child)-[:CHILD_OF]->(m))
            "#,
        )
        .param("uri", roadmap.uri.clone())
        .param("name", roadmap.name.clone())
        .param("description", roadmap.description.clone().unwrap_or_default())
        .param("image", roadmap.image.clone().unwrap_or_default())
        .param("parent_uri", roadmap.parent_uri.clone().unwrap_or_default());

        self.graph.run(q).await?;
        Ok(())
    }

    fn node_to_roadmap(node: &neo4rs::Node) -> Result<RoadmapNode> {
        Ok(RoadmapNode {
            uri: node.get("uri").context("Roadmap node without uri")?,
            name: node.get("name").context("Roadmap node without name")?,
            description: node.get("description").ok(),
            image: node.get("image").ok(),
            parent_uri: node
                .get::<String>("parent_uri")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    /// List the comments of a resource or roadmap with their authors, in
    /// insertion order
    pub async fn list_comments(
        &self,
        subject: CommentSubject,
        subject_uri: &str,
    ) -> Result<Vec<CommentWithAuthor>> {
        let q = query(
            r#"
            MATCH (c:Comment {subject: $subject, subject_uri: $subject_uri})
            OPTIONAL MATCH (u:User {id: c.author_id})
            RETURN c, u
            ORDER BY c.seq ASC
            "#,
        )
        .param("subject", subject.as_str())
        .param("subject_uri", subject_uri);

        let mut result = self.graph.execute(q).await?;
        let mut comments = Vec::new();

        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("c")?;
            let author = match row.get::<neo4rs::Node>("u") {
                Ok(u) => Some(Self::node_to_user(&u)?),
                Err(_) => None,
            };
            comments.push(CommentWithAuthor {
                comment: Self::node_to_comment(&node)?,
                author,
            });
        }

        Ok(comments)
    }

    /// Insert a comment, sequencing it after the existing ones of its subject
    pub async fn create_comment(&self, comment: &CommentNode) -> Result<()> {
        let q = query(&create_comment_cypher(comment.subject))
            .param("id", comment.id.to_string())
            .param("content", comment.content.clone())
            .param("author_id", comment.author_id.to_string())
            .param("subject", comment.subject.as_str())
            .param("subject_uri", comment.subject_uri.clone())
            .param("timestamp", comment.timestamp.to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    fn node_to_comment(node: &neo4rs::Node) -> Result<CommentNode> {
        Ok(CommentNode {
            id: node
                .get::<String>("id")
                .context("Comment node without id")?
                .parse()?,
            content: node.get("content").context("Comment node without content")?,
            author_id: node
                .get::<String>("author_id")
                .context("Comment node without author_id")?
                .parse()?,
            subject: node
                .get::<String>("subject")
                .context("Comment node without subject")?
                .parse()?,
            subject_uri: node
                .get("subject_uri")
                .context("Comment node without subject_uri")?,
            timestamp: node
                .get::<String>("timestamp")
                .context("Comment node without timestamp")?
                .parse()
                .context("Comment timestamp is not RFC 3339")?,
        })
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserNode>> {
        let q = query(
            r#"
            MATCH (u:User {id: $id})
            RETURN u
            "#,
        )
        .param("id", id.to_string());

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("u")?;
            Ok(Some(Self::node_to_user(&node)?))
        } else {
            Ok(None)
        }
    }

    /// Create or replace a user
    pub async fn upsert_user(&self, user: &UserNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (u:User {id: $id})
            SET u.name = $name,
                u.image = CASE WHEN $image = '' THEN null ELSE $image END,
                u.favorites = $favorites,
                u.roadmaps = $roadmaps
            "#,
        )
        .param("id", user.id.to_string())
        .param("name", user.name.clone())
        .param("image", user.image.clone().unwrap_or_default())
        .param("favorites", user.favorites.clone())
        .param("roadmaps", user.roadmaps.clone());

        self.graph.run(q).await?;
        Ok(())
    }

    /// Return the stored user, creating it from `user` when absent
    pub async fn get_or_create_user(&self, user: &UserNode) -> Result<UserNode> {
        let q = query(
            r#"
            MERGE (u:User {id: $id})
            ON CREATE SET u.name = $name,
                          u.image = CASE WHEN $image = '' THEN null ELSE $image END,
                          u.favorites = [],
                          u.roadmaps = []
            RETURN u
            "#,
        )
        .param("id", user.id.to_string())
        .param("name", user.name.clone())
        .param("image", user.image.clone().unwrap_or_default());

        let mut result = self.graph.execute(q).await?;
        let row = result
            .next()
            .await?
            .context("MERGE on User returned no row")?;
        let node: neo4rs::Node = row.get("u")?;
        Self::node_to_user(&node)
    }

    fn node_to_user(node: &neo4rs::Node) -> Result<UserNode> {
        Ok(UserNode {
            id: node
                .get::<String>("id")
                .context("User node without id")?
                .parse()?,
            name: node.get("name").context("User node without name")?,
            image: node.get("image").ok(),
            favorites: node.get("favorites").unwrap_or_default(),
            roadmaps: node.get("roadmaps").unwrap_or_default(),
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn count(&self, q: neo4rs::Query) -> Result<usize> {
        let mut result = self.graph.execute(q).await?;
        let count: i64 = match result.next().await? {
            Some(row) => row.get("count")?,
            None => 0,
        };
        Ok(count.max(0) as usize)
    }
}

/// Cypher that appends a comment to its subject's thread.
///
/// The subject node is write-locked before its `comment_seq` counter is read,
/// so concurrent appends to one subject get distinct, increasing sequence numbers.
fn create_comment_cypher(subject: CommentSubject) -> String {
    format!(
        r#"
        MATCH (s:{label} {{uri: $subject_uri}})
        SET s._comment_lock = true
        WITH s
        SET s.comment_seq = coalesce(s.comment_seq, 0) + 1
        REMOVE s._comment_lock
        WITH s, s.comment_seq AS seq
        CREATE (s)-[:HAS_COMMENT]->(c:Comment {{
            id: $id,
            content: $content,
            author_id: $author_id,
            subject: $subject,
            subject_uri: $subject_uri,
            timestamp: $timestamp,
            seq: seq
        }})
        "#,
        label = subject.label()
    )
}
