//! Node CRUD and Connection Endpoints
//!
//! REST surface over [`mindmesh_core::services::NodeService`]:
//!
//! - `GET /api/health` - Health check
//! - `GET /api/nodes` - List all nodes
//! - `POST /api/nodes` - Create a node
//! - `GET /api/nodes/:id` - Get a node by ID
//! - `PUT /api/nodes/:id` - Replace a node
//! - `PATCH /api/nodes/:id` - Partially update a node
//! - `DELETE /api/nodes/:id` - Delete a node
//! - `POST /api/nodes/connect` - Connect two nodes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::http_error::HttpError;
use crate::AppState;
use mindmesh_core::models::{ConnectRequest, Node, NodeDraft, NodePatch};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Response body for `POST /api/nodes/connect`
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectResponse {
    /// Whether a new link was created. `false` means either node was
    /// missing or the pair was already connected.
    pub applied: bool,
}

/// Build the node endpoint router
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/nodes", get(list_nodes).post(create_node))
        .route("/api/nodes/connect", post(connect_nodes))
        .route(
            "/api/nodes/:id",
            get(get_node)
                .put(update_node)
                .patch(patch_node)
                .delete(delete_node),
        )
        .with_state(state)
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:8080/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List all nodes with their adjacency lists
async fn list_nodes(State(state): State<AppState>) -> Result<Json<Vec<Node>>, HttpError> {
    let nodes = state.node_service.list_nodes().await?;
    Ok(Json(nodes))
}

/// Get a node by ID
///
/// Returns 404 when the node does not exist, 400 when the identifier
/// is not numeric.
async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Node>, HttpError> {
    match state.node_service.get_node(&id).await? {
        Some(node) => Ok(Json(node)),
        None => Err(HttpError::node_not_found(id)),
    }
}

/// Create a new node
///
/// ```bash
/// curl -X POST http://localhost:8080/api/nodes \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Root", "x": 0, "y": 0, "type": "IDEA"}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    Json(draft): Json<NodeDraft>,
) -> Result<(StatusCode, Json<Node>), HttpError> {
    let node = state.node_service.create_node(draft).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

/// Replace all mutable fields of a node
async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<NodeDraft>,
) -> Result<Json<Node>, HttpError> {
    match state.node_service.update_node(&id, draft).await? {
        Some(node) => Ok(Json(node)),
        None => Err(HttpError::node_not_found(id)),
    }
}

/// Apply a partial update; absent fields keep their stored values
async fn patch_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<NodePatch>,
) -> Result<Json<Node>, HttpError> {
    match state.node_service.patch_node(&id, patch).await? {
        Some(node) => Ok(Json(node)),
        None => Err(HttpError::node_not_found(id)),
    }
}

/// Delete a node and its links
async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    if state.node_service.delete_node(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(HttpError::node_not_found(id))
    }
}

/// Connect two nodes with an undirected link
///
/// Responds 200 with `{"applied": false}` when either node is missing
/// or the pair is already connected; that outcome is not an error.
async fn connect_nodes(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, HttpError> {
    let applied = state.node_service.connect_nodes(request).await?;
    Ok(Json(ConnectResponse { applied }))
}
