//! Database Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Database initialization and connection management
//! - Node storage with server-assigned numeric identifiers
//! - Undirected link storage with storage-level deduplication
//! - Domain events for live update fan-out
//!
//! # Architecture
//!
//! The concrete storage engine is pluggable: business logic depends only on
//! the [`NodeStore`] trait. [`LibsqlStore`] is the embedded SQLite-compatible
//! implementation used in production and tests.

mod database;
mod error;
pub mod events;
mod libsql_store;
mod node_store;

pub use database::{DatabaseService, DbCreateNodeParams, DbNodeRow, DbPatchNodeParams};
pub use error::DatabaseError;
pub use events::DomainEvent;
pub use libsql_store::LibsqlStore;
pub use node_store::NodeStore;
