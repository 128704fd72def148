//! MindMesh Core Business Logic Layer
//!
//! This crate provides the data model, persistence layer, and service
//! orchestration for the MindMesh collaborative mind-mapping backend.
//!
//! # Architecture
//!
//! - **Universal node graph**: nodes with canvas positions connected by
//!   undirected links
//! - **libsql**: Embedded SQLite-compatible database, one transaction per
//!   service call
//! - **Domain events**: tokio broadcast channel for live update fan-out
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodeDraft, NodePatch, ...)
//! - [`services`] - Business services (NodeService)
//! - [`db`] - Database layer with libsql integration

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::*;
pub use models::*;
pub use services::*;
