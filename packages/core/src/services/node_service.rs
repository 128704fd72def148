//! Node Service - Core CRUD and Connection Operations
//!
//! This module provides the main business logic layer for mind-map nodes:
//!
//! - CRUD operations (create, read, update, patch, delete)
//! - Connection management with duplicate-edge suppression
//! - Domain event broadcasting for live updates
//!
//! # Outcome Conventions
//!
//! - A missing node is a normal negative outcome: read/update/patch return
//!   `Ok(None)`, delete returns `Ok(false)`.
//! - `connect_nodes` returns `Ok(false)` ("not applied") when either node is
//!   missing or the pair is already connected; `Ok(true)` when a new link
//!   was created.
//! - Malformed identifiers and invalid payloads are errors
//!   ([`NodeServiceError::InvalidId`], [`NodeServiceError::ValidationFailed`]).
//!
//! Each service call maps to a single storage transaction; the service does
//! no in-memory coordination of its own.

use crate::db::events::DomainEvent;
use crate::db::NodeStore;
use crate::models::{ConnectRequest, Node, NodeDraft, NodePatch};
use crate::services::error::NodeServiceError;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel capacity for domain events.
///
/// 128 provides sufficient headroom for burst operations while limiting
/// memory overhead. Subscriber lag is acceptable - clients only track
/// current state, not historical events.
const DOMAIN_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Parse a string identifier to a numeric node ID
///
/// # Examples
///
/// ```
/// # use mindmesh_core::services::node_service::parse_id;
/// assert!(parse_id("42").is_ok());
/// assert!(parse_id("forty-two").is_err());
/// ```
pub fn parse_id(id: &str) -> Result<i64, NodeServiceError> {
    id.trim()
        .parse::<i64>()
        .map_err(|_| NodeServiceError::invalid_id(id))
}

/// Core service for node CRUD and connection operations
///
/// # Examples
///
/// ```no_run
/// use mindmesh_core::db::{DatabaseService, LibsqlStore};
/// use mindmesh_core::models::{NodeDraft, NodeType};
/// use mindmesh_core::services::NodeService;
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/mindmesh.db")).await?);
///     let service = NodeService::new(Arc::new(LibsqlStore::new(db)));
///
///     let node = service
///         .create_node(NodeDraft {
///             title: "Root".to_string(),
///             description: None,
///             x: 0.0,
///             y: 0.0,
///             color: None,
///             node_type: NodeType::Idea,
///         })
///         .await?;
///     println!("Created node: {}", node.id);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct NodeService {
    /// Pluggable storage backend for all persistence operations
    store: Arc<dyn NodeStore>,

    /// Broadcast channel for domain events
    event_tx: broadcast::Sender<DomainEvent>,
}

impl NodeService {
    /// Create a new NodeService on top of a storage backend
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        let (event_tx, _) = broadcast::channel(DOMAIN_EVENT_CHANNEL_CAPACITY);

        Self { store, event_tx }
    }

    /// Get access to the underlying store
    ///
    /// Useful for advanced operations that need direct storage access.
    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.store
    }

    /// Subscribe to domain events
    ///
    /// Returns a broadcast receiver that receives all domain events (node
    /// created, updated, deleted, graph changed).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mindmesh_core::db::{DatabaseService, LibsqlStore};
    /// # use mindmesh_core::services::NodeService;
    /// # use std::sync::Arc;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let db = Arc::new(DatabaseService::new("./data/mindmesh.db".into()).await?);
    /// # let service = NodeService::new(Arc::new(LibsqlStore::new(db)));
    /// let mut rx = service.subscribe_to_events();
    /// tokio::spawn(async move {
    ///     while let Ok(event) = rx.recv().await {
    ///         println!("Event: {}", event.event_type());
    ///     }
    /// });
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
    }

    /// Emit a domain event to all subscribers
    ///
    /// Fire-and-forget: errors are ignored when no subscribers are attached.
    fn emit_event(&self, event: DomainEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Retrieve all nodes, each with its adjacency list populated
    pub async fn list_nodes(&self) -> Result<Vec<Node>, NodeServiceError> {
        tracing::debug!("Retrieving all mind nodes");
        let nodes = self
            .store
            .list_nodes()
            .await
            .map_err(|e| NodeServiceError::query_failed(format!("Failed to list nodes: {}", e)))?;
        tracing::debug!("Retrieved {} nodes", nodes.len());
        Ok(nodes)
    }

    /// Retrieve a specific node by its string identifier
    ///
    /// # Errors
    ///
    /// Fails with `InvalidId` if the identifier does not parse; a missing
    /// node is `Ok(None)`, never an error.
    pub async fn get_node(&self, id: &str) -> Result<Option<Node>, NodeServiceError> {
        tracing::debug!("Retrieving node by ID: {}", id);
        let node_id = parse_id(id)?;

        let node = self.store.get_node(node_id).await.map_err(|e| {
            NodeServiceError::query_failed(format!("Failed to fetch node {}: {}", node_id, e))
        })?;

        if node.is_some() {
            tracing::debug!("Node found: {}", node_id);
        } else {
            tracing::warn!("Node not found: {}", node_id);
        }
        Ok(node)
    }

    /// Create a new node and broadcast the creation
    ///
    /// The identifier and timestamps are assigned by the persistence layer.
    pub async fn create_node(&self, draft: NodeDraft) -> Result<Node, NodeServiceError> {
        tracing::info!("Creating new node: {}", draft.title);
        draft.validate()?;

        let node = self
            .store
            .create_node(draft)
            .await
            .map_err(|e| NodeServiceError::query_failed(format!("Failed to insert node: {}", e)))?;

        tracing::info!("Node created with ID: {}", node.id);
        self.emit_event(DomainEvent::NodeCreated(node.clone()));
        Ok(node)
    }

    /// Replace all mutable fields of an existing node and broadcast the update
    ///
    /// Returns `Ok(None)` if the identifier does not resolve to a node.
    pub async fn update_node(
        &self,
        id: &str,
        draft: NodeDraft,
    ) -> Result<Option<Node>, NodeServiceError> {
        tracing::info!("Updating node ID: {}", id);
        let node_id = parse_id(id)?;
        draft.validate()?;

        let updated = self.store.replace_node(node_id, draft).await.map_err(|e| {
            NodeServiceError::query_failed(format!("Failed to update node {}: {}", node_id, e))
        })?;

        match updated {
            Some(node) => {
                tracing::info!("Node updated: {}", node_id);
                self.emit_event(DomainEvent::NodeUpdated(node.clone()));
                Ok(Some(node))
            }
            None => {
                tracing::warn!("Node not found for update: {}", node_id);
                Ok(None)
            }
        }
    }

    /// Apply a partial update and broadcast the result
    ///
    /// Only the fields present in the patch are modified; all others keep
    /// their stored values. Returns `Ok(None)` if the node does not exist.
    pub async fn patch_node(
        &self,
        id: &str,
        patch: NodePatch,
    ) -> Result<Option<Node>, NodeServiceError> {
        tracing::info!("Patching node ID: {}", id);
        let node_id = parse_id(id)?;
        patch.validate()?;

        let patched = self.store.patch_node(node_id, patch).await.map_err(|e| {
            NodeServiceError::query_failed(format!("Failed to patch node {}: {}", node_id, e))
        })?;

        match patched {
            Some(node) => {
                tracing::info!("Node patched: {}", node_id);
                self.emit_event(DomainEvent::NodeUpdated(node.clone()));
                Ok(Some(node))
            }
            None => {
                tracing::warn!("Node not found for patch: {}", node_id);
                Ok(None)
            }
        }
    }

    /// Delete a node (links cascade) and broadcast a deletion notice
    ///
    /// Returns `Ok(false)` without side effects when the node is missing.
    pub async fn delete_node(&self, id: &str) -> Result<bool, NodeServiceError> {
        tracing::info!("Deleting node ID: {}", id);
        let node_id = parse_id(id)?;

        let deleted = self.store.delete_node(node_id).await.map_err(|e| {
            NodeServiceError::query_failed(format!("Failed to delete node {}: {}", node_id, e))
        })?;

        if deleted {
            tracing::info!("Node deleted: {}", node_id);
            self.emit_event(DomainEvent::NodeDeleted { id: node_id });
        } else {
            tracing::warn!("Node not found for deletion: {}", node_id);
        }
        Ok(deleted)
    }

    /// Connect two nodes and broadcast the updated graph
    ///
    /// Returns `Ok(true)` when a new undirected link was created, `Ok(false)`
    /// ("not applied") when either node is missing, the pair is already
    /// connected, or both identifiers name the same node. Blank or malformed
    /// identifiers are errors.
    pub async fn connect_nodes(&self, request: ConnectRequest) -> Result<bool, NodeServiceError> {
        tracing::info!(
            "Connecting nodes: {} -> {}",
            request.source_id,
            request.target_id
        );
        request.validate()?;
        let source_id = parse_id(&request.source_id)?;
        let target_id = parse_id(&request.target_id)?;

        // A node cannot be linked to itself; the link table only stores
        // strictly ordered pairs.
        if source_id == target_id {
            tracing::warn!("Refusing self-connection for node {}", source_id);
            return Ok(false);
        }

        let source_exists = self.store.node_exists(source_id).await.map_err(|e| {
            NodeServiceError::query_failed(format!("Failed to check node {}: {}", source_id, e))
        })?;
        let target_exists = self.store.node_exists(target_id).await.map_err(|e| {
            NodeServiceError::query_failed(format!("Failed to check node {}: {}", target_id, e))
        })?;

        if !source_exists || !target_exists {
            tracing::warn!(
                "One or both nodes not found for connection: {} -> {}",
                source_id,
                target_id
            );
            return Ok(false);
        }

        // One-hop adjacency check on the source side; links are undirected
        // so checking one side covers both.
        let connected = self.store.connected_ids(source_id).await.map_err(|e| {
            NodeServiceError::query_failed(format!("Failed to read adjacency: {}", e))
        })?;
        if connected.contains(&target_id) {
            tracing::warn!("Nodes already connected: {} -> {}", source_id, target_id);
            return Ok(false);
        }

        self.store
            .create_link(source_id, target_id)
            .await
            .map_err(|e| {
                NodeServiceError::query_failed(format!(
                    "Failed to connect {} -> {}: {}",
                    source_id, target_id, e
                ))
            })?;

        tracing::info!("Nodes connected: {} -> {}", source_id, target_id);
        let snapshot = self.list_nodes().await?;
        self.emit_event(DomainEvent::GraphChanged(snapshot));
        Ok(true)
    }
}
