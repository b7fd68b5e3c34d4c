//! ComputerStacks library backend
//!
//! Serves the community-curated catalog of learning resources:
//! - Neo4j graph of categories, resources, members and comments
//! - Breadcrumb paths and per-depth static path enumeration
//! - Newest-first comment threads with session-gated comment creation

pub mod api;
pub mod auth;
pub mod library;
pub mod neo4j;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub library: LibraryYamlConfig,
    /// Auth section. If absent no session can be verified and every write is rejected.
    pub auth: Option<AuthConfig>,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "computerstacks".into(),
        }
    }
}

/// Library configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibraryYamlConfig {
    /// Longest parent chain a path walk follows before reporting the data as broken
    pub max_depth: usize,
}

impl Default for LibraryYamlConfig {
    fn default() -> Self {
        Self {
            max_depth: library::paths::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Session verification settings.
///
/// Sessions are issued by the external sign-in flow and signed with
/// `jwt_secret` (HS256, minimum 32 characters).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of tokens minted by the CLI for local testing (default: 28800 = 8h)
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
}

fn default_jwt_expiry() -> u64 {
    28800 // 8 hours
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub server_port: u16,
    pub max_depth: usize,
    /// None means sessions cannot be verified (no auth section and no JWT_SECRET)
    pub auth_config: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from `config.yaml` in CWD (if any) and env vars.
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        // JWT_SECRET overrides the YAML secret, or enables sessions on its own
        let auth_config = match (std::env::var("JWT_SECRET").ok(), yaml.auth) {
            (Some(secret), Some(auth)) => Some(AuthConfig {
                jwt_secret: secret,
                ..auth
            }),
            (Some(secret), None) => Some(AuthConfig {
                jwt_secret: secret,
                jwt_expiry_secs: default_jwt_expiry(),
            }),
            (None, auth) => auth,
        };

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            max_depth: std::env::var("LIBRARY_MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.library.max_depth),
            auth_config,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn neo4j::HierarchyStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Neo4j and build the application state
    pub async fn new(config: Config) -> Result<Self> {
        let store = Arc::new(
            neo4j::client::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
            )
            .await?,
        );

        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }

    /// Library operations over this state's store
    pub fn library(&self) -> library::LibraryManager {
        library::LibraryManager::new(self.store.clone(), self.config.max_depth)
    }
}

/// Connect to the store and serve the HTTP API until the process stops
pub async fn start_server(config: Config) -> Result<()> {
    let port = config.server_port;
    let state = AppState::new(config).await?;
    tracing::info!("Connected to Neo4j");

    if state.config.auth_config.is_none() {
        tracing::warn!("No auth configured: comment creation will be rejected");
    }

    let server_state = Arc::new(api::handlers::ServerState {
        library: Arc::new(state.library()),
        auth_config: state.config.auth_config.clone(),
    });
    let app = api::create_router(server_state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
