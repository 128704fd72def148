//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `NodeService` - CRUD operations, connection management, and event
//!   broadcasting
//!
//! Services coordinate between the database layer and application logic,
//! implementing business rules and orchestrating operations.

pub mod error;
pub mod node_service;

pub use error::NodeServiceError;
pub use node_service::NodeService;
