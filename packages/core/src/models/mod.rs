//! Data models for MindMesh
//!
//! Contains the core `Node` struct, request/response payload types, and
//! validation errors shared by the database and service layers.

pub mod node;

pub use node::{ConnectRequest, Node, NodeDraft, NodePatch, NodeType, ValidationError};
