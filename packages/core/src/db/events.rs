//! Domain Events
//!
//! This module defines the domain events emitted by [`crate::services::NodeService`]
//! when data changes. They follow the observer pattern, allowing other parts
//! of the system (like the WebSocket layer) to subscribe to data changes
//! without coupling to the service implementation.
//!
//! # Event Flow
//!
//! 1. NodeService performs a data operation (create, update, delete, connect)
//! 2. A domain event is emitted via a tokio broadcast channel
//! 3. All subscribers receive the event asynchronously
//! 4. The WebSocket layer forwards events to connected clients
//!
//! Publishing is fire-and-forget: a send with no subscribers is not an error.

use crate::models::Node;

/// Domain events emitted by NodeService
///
/// Events represent domain-level changes, not database operations. Node
/// payloads carry the full post-operation state, including `connection_ids`.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A new node was created
    NodeCreated(Node),

    /// An existing node was updated (full replacement or patch)
    NodeUpdated(Node),

    /// A node was deleted
    NodeDeleted { id: i64 },

    /// The connection graph changed; carries a full node-list snapshot
    GraphChanged(Vec<Node>),
}

impl DomainEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            DomainEvent::NodeCreated(_) => "node:created",
            DomainEvent::NodeUpdated(_) => "node:updated",
            DomainEvent::NodeDeleted { .. } => "node:deleted",
            DomainEvent::GraphChanged(_) => "graph:changed",
        }
    }
}
