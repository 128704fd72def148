//! NodeStore Trait - Database Abstraction Layer
//!
//! This module defines the `NodeStore` trait that abstracts persistence
//! operations for mind-map nodes. The trait keeps the concrete storage
//! engine pluggable without changing business logic in NodeService.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async to support both embedded and
//!    network backends
//! 2. **Narrow surface**: Only the queries the service actually issues
//!    (find-by-id, save, delete, neighbors, link creation, conditional
//!    field update)
//! 3. **Error Handling**: Uses `anyhow::Result` for flexible error context
//! 4. **Atomicity**: Each method is a single storage transaction; the
//!    service performs no coordination of its own

use crate::models::{Node, NodeDraft, NodePatch};
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction layer for node persistence operations
///
/// Implementations must be `Send + Sync` to allow usage in async contexts
/// where futures may be moved between threads.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Create a new node with a storage-assigned identifier and timestamps
    ///
    /// Returns the created node with all generated fields populated.
    async fn create_node(&self, draft: NodeDraft) -> Result<Node>;

    /// Get a node by ID, with `connection_ids` populated
    ///
    /// Returns `Ok(None)` if the node does not exist (not an error).
    async fn get_node(&self, id: i64) -> Result<Option<Node>>;

    /// Check whether a node exists
    async fn node_exists(&self, id: i64) -> Result<bool>;

    /// Get all nodes ordered by ID, each with `connection_ids` populated
    async fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Replace all mutable fields of a node
    ///
    /// Returns the updated node, or `Ok(None)` if the node does not exist.
    /// The identifier and `created_at` are never changed.
    async fn replace_node(&self, id: i64, draft: NodeDraft) -> Result<Option<Node>>;

    /// Apply only the fields present in the patch, leaving others untouched
    ///
    /// Returns the updated node, or `Ok(None)` if the node does not exist.
    async fn patch_node(&self, id: i64, patch: NodePatch) -> Result<Option<Node>>;

    /// Delete a node and (via storage cascade) every link referencing it
    ///
    /// Returns `true` if a node was deleted, `false` if it did not exist.
    async fn delete_node(&self, id: i64) -> Result<bool>;

    /// Get IDs of all nodes directly connected to the given node
    async fn connected_ids(&self, id: i64) -> Result<Vec<i64>>;

    /// Create an undirected link between two existing nodes
    ///
    /// Idempotent at the storage level: linking an already-linked pair is a
    /// no-op. Existence and adjacency checks are the service's concern.
    async fn create_link(&self, source: i64, target: i64) -> Result<()>;
}
