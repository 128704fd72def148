//! MindMesh HTTP and WebSocket server
//!
//! Exposes the node service as a REST API plus a WebSocket channel for
//! live graph updates.
//!
//! # Architecture
//!
//! Routing is split into modular endpoint modules, each contributing its
//! routes via `.merge()`:
//! - `node_endpoints`: node CRUD and connection operations
//! - `ws`: WebSocket upgrade and broadcast forwarding
//!
//! # Security
//!
//! - CORS restricted to localhost dev origins (override with
//!   `CORS_ALLOW_ORIGIN`)
//! - No authentication (single-user, local deployments)

use axum::{
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use mindmesh_core::services::NodeService;

mod http_error;
mod node_endpoints;
mod ws;

pub use http_error::HttpError;

/// Application state shared across all endpoints
///
/// The service is cheap to clone per-request; every WebSocket session
/// subscribes to its broadcast channel.
#[derive(Clone)]
pub struct AppState {
    pub node_service: Arc<NodeService>,
}

/// Create the main application router with all endpoint modules
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(node_endpoints::routes(state.clone()))
        .merge(ws::routes(state))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Create CORS layer for browser clients
///
/// Allows requests from common local dev origins. Supports a custom origin
/// via the CORS_ALLOW_ORIGIN environment variable.
fn cors_layer() -> CorsLayer {
    let default_origins = [
        "http://localhost:3000", // frontend dev server
        "http://localhost:5173", // Vite default
    ];

    let origins: Vec<header::HeaderValue> =
        if let Ok(custom_origin) = std::env::var("CORS_ALLOW_ORIGIN") {
            vec![custom_origin
                .parse::<header::HeaderValue>()
                .expect("Invalid CORS_ALLOW_ORIGIN - must be valid HTTP origin")]
        } else {
            default_origins
                .iter()
                .map(|o| o.parse::<header::HeaderValue>().unwrap())
                .collect()
        };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .allow_credentials(false)
}

/// Start the HTTP server
///
/// Binds to 127.0.0.1 on the given port and serves until the process
/// is stopped.
pub async fn start_server(node_service: Arc<NodeService>, port: u16) -> anyhow::Result<()> {
    let state = AppState { node_service };
    let app = create_router(state);

    let addr = format!("127.0.0.1:{}", port);
    tracing::info!("MindMesh server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
