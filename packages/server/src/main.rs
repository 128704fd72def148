//! MindMesh Server Binary
//!
//! Starts the HTTP and WebSocket server backed by a local libsql database.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: port 8080, database at ./data/mindmesh.db
//! cargo run --bin mindmesh-server
//!
//! # Custom port and database location
//! PORT=9000 MINDMESH_DB=/tmp/mindmesh.db cargo run --bin mindmesh-server
//! ```
//!
//! # Environment Variables
//!
//! - `PORT`: Server port (default: 8080)
//! - `MINDMESH_DB`: Database file path (default: ./data/mindmesh.db)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use mindmesh_core::db::{DatabaseService, LibsqlStore};
use mindmesh_core::services::NodeService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let db_path: PathBuf = env::var("MINDMESH_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data/mindmesh.db"));

    tracing::info!("Database: {}", db_path.display());

    let db = Arc::new(DatabaseService::new(db_path).await?);
    let store = Arc::new(LibsqlStore::new(db));
    let node_service = Arc::new(NodeService::new(store));

    mindmesh_server::start_server(node_service, port).await?;

    Ok(())
}
