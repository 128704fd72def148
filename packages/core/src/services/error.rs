//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations, providing
//! detailed error handling for business logic failures.
//!
//! Not-found and "already connected" outcomes are NOT errors: the service
//! conveys them through `Option` / `bool` return values. The variants here
//! cover genuinely exceptional conditions.

use crate::db::DatabaseError;
use crate::models::ValidationError;
use thiserror::Error;

/// Service operation errors
///
/// Provides high-level error types for all service operations,
/// with detailed context and proper error chaining.
#[derive(Error, Debug)]
pub enum NodeServiceError {
    /// Identifier string could not be parsed as a numeric node ID
    #[error("Invalid node ID: {id}")]
    InvalidId { id: String },

    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Validation failed for a request payload
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    DatabaseError(#[from] DatabaseError),

    /// Query execution error
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl NodeServiceError {
    /// Create an invalid ID error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create a query failed error
    pub fn query_failed(msg: impl Into<String>) -> Self {
        Self::QueryFailed(msg.into())
    }
}
