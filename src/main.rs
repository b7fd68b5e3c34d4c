//! ComputerStacks - Library Server
//!
//! Serves the resource library API backed by Neo4j.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use computerstacks::library::parents_first;
use computerstacks::neo4j::models::{CategoryNode, ResourceNode, RoadmapNode, UserNode};
use computerstacks::{AppState, Config};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "computerstacks")]
#[command(about = "ComputerStacks library server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides config.yaml / SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load a YAML catalog of categories, resources, roadmaps and members into Neo4j
    Import {
        /// Catalog file
        file: PathBuf,
    },

    /// Print every routable category and resource path as JSON
    StaticPaths,

    /// Mint a session token for local testing
    Token {
        /// Member id (random if omitted)
        #[arg(long)]
        user_id: Option<Uuid>,

        /// Member display name
        #[arg(long, default_value = "Local Tester")]
        name: String,
    },
}

/// Catalog file layout accepted by `import`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Catalog {
    categories: Vec<CategoryNode>,
    resources: Vec<ResourceNode>,
    roadmaps: Vec<RoadmapNode>,
    users: Vec<UserNode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,computerstacks=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            computerstacks::start_server(config).await
        }
        Commands::Import { file } => run_import(config, &file).await,
        Commands::StaticPaths => run_static_paths(config).await,
        Commands::Token { user_id, name } => run_token(config, user_id, &name),
    }
}

async fn run_import(config: Config, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read catalog {}", file.display()))?;
    let catalog: Catalog = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse catalog {}", file.display()))?;

    tracing::info!(
        "Importing {} categories, {} resources, {} roadmaps, {} members from {}",
        catalog.categories.len(),
        catalog.resources.len(),
        catalog.roadmaps.len(),
        catalog.users.len(),
        file.display()
    );

    let state = AppState::new(config).await?;

    // Parents before children so every CHILD_OF edge finds its target,
    // and categories before the resources filed under them
    for category in &parents_first(&catalog.categories) {
        state.store.upsert_category(category).await?;
    }
    for resource in &catalog.resources {
        state.store.upsert_resource(resource).await?;
    }
    for roadmap in &parents_first(&catalog.roadmaps) {
        state.store.upsert_roadmap(roadmap).await?;
    }
    for user in &catalog.users {
        state.store.upsert_user(user).await?;
    }

    // Report anything the import left unreachable
    let paths = state.library().static_paths().await?;
    tracing::info!(
        "Import complete: {} levels, {} orphans",
        paths.levels.len(),
        paths.orphans.len()
    );

    Ok(())
}

async fn run_static_paths(config: Config) -> Result<()> {
    let state = AppState::new(config).await?;
    let paths = state.library().static_paths().await?;
    println!("{}", serde_json::to_string_pretty(&paths)?);
    Ok(())
}

fn run_token(config: Config, user_id: Option<Uuid>, name: &str) -> Result<()> {
    let auth = config
        .auth_config
        .context("No auth configured: set auth.jwt_secret or JWT_SECRET")?;
    let user_id = user_id.unwrap_or_else(Uuid::new_v4);

    let token = computerstacks::auth::jwt::encode_jwt(
        user_id,
        name,
        &auth.jwt_secret,
        auth.jwt_expiry_secs,
    )?;
    tracing::info!("Minted token for member {}", user_id);
    println!("{}", token);
    Ok(())
}
