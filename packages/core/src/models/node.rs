//! Node Data Structures
//!
//! This module defines the core `Node` struct and the payload types used by
//! the service layer for the mind-map graph.
//!
//! # Architecture
//!
//! - **Flat wire shape**: clients exchange a flat JSON object; the graph
//!   relationship is exposed as a derived `connectionIds` list
//! - **Server-assigned identity**: `id` is allocated by the database and
//!   immutable once assigned
//! - **Partial updates**: `NodePatch` carries only the fields a client
//!   explicitly supplied; everything else stays untouched
//!
//! # Examples
//!
//! ```rust
//! use mindmesh_core::models::{NodeDraft, NodeType};
//!
//! let draft = NodeDraft {
//!     title: "Main Idea".to_string(),
//!     description: Some("The central concept".to_string()),
//!     x: 100.0,
//!     y: 200.0,
//!     color: Some("#FF5733".to_string()),
//!     node_type: NodeType::Idea,
//! };
//! assert!(draft.validate().is_ok());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation errors for node payloads
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field cannot be blank: {0}")]
    BlankField(String),

    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),
}

/// Category of a mind-map node
///
/// Serialized in uppercase on the wire (`"IDEA"`, `"NOTE"`, ...), matching
/// the public API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    /// A general idea or concept
    Idea,
    /// A simple note or annotation
    Note,
    /// An actionable task or to-do item
    Task,
    /// A question or inquiry
    Question,
    /// A decision point or choice
    Decision,
    /// A reference to external information
    Reference,
}

impl NodeType {
    /// Wire representation of the type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Idea => "IDEA",
            NodeType::Note => "NOTE",
            NodeType::Task => "TASK",
            NodeType::Question => "QUESTION",
            NodeType::Decision => "DECISION",
            NodeType::Reference => "REFERENCE",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDEA" => Ok(NodeType::Idea),
            "NOTE" => Ok(NodeType::Note),
            "TASK" => Ok(NodeType::Task),
            "QUESTION" => Ok(NodeType::Question),
            "DECISION" => Ok(NodeType::Decision),
            "REFERENCE" => Ok(NodeType::Reference),
            other => Err(ValidationError::InvalidNodeType(other.to_string())),
        }
    }
}

/// A mind-map node with its derived adjacency list
///
/// # Fields
///
/// - `id`: Database-assigned identifier, immutable once assigned
/// - `title`: Primary label (required, non-blank)
/// - `description`: Optional longer text
/// - `x`, `y`: Canvas position
/// - `color`: Optional hex color string
/// - `node_type`: Category tag (serialized as `type`)
/// - `created_at` / `updated_at`: Timestamps assigned by the persistence layer
/// - `connection_ids`: IDs of directly connected nodes, populated on read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Database-assigned identifier
    pub id: i64,

    /// Primary label of the node
    pub title: String,

    /// Optional longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// X-coordinate on the canvas
    pub x: f64,

    /// Y-coordinate on the canvas
    pub y: f64,

    /// Optional hex color code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Category tag
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,

    /// IDs of directly connected nodes (derived, populated on read)
    #[serde(default)]
    pub connection_ids: Vec<i64>,
}

/// Payload for creating a node or fully replacing its mutable fields
///
/// `x`, `y` and `type` are required at the serde level; a request missing
/// any of them is rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDraft {
    /// Primary label (required, non-blank)
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// X-coordinate on the canvas
    pub x: f64,

    /// Y-coordinate on the canvas
    pub y: f64,

    /// Optional hex color code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Category tag
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

impl NodeDraft {
    /// Validate the draft before persisting
    ///
    /// Presence of `x`, `y` and `type` is already enforced by
    /// deserialization; the remaining rule is a non-blank title.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankField("title".to_string()));
        }
        Ok(())
    }
}

/// Partial update payload
///
/// Only fields present in the incoming JSON are applied; absent fields keep
/// their stored values. A `null` value is treated the same as an absent
/// field (matching the conditional-update semantics of the storage query).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    /// New title, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New x-coordinate, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    /// New y-coordinate, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    /// New color, if supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// New category tag, if supplied
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
}

impl NodePatch {
    /// Whether the patch carries at least one field
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.color.is_none()
            && self.node_type.is_none()
    }

    /// Validate the patch before persisting
    ///
    /// A supplied title must still be non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::BlankField("title".to_string()));
            }
        }
        Ok(())
    }
}

/// Request to connect two nodes
///
/// IDs arrive as strings (mirroring the WebSocket message shape) and are
/// parsed to numeric identifiers by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    /// ID of the source node
    pub source_id: String,

    /// ID of the target node
    pub target_id: String,
}

impl ConnectRequest {
    /// Validate that both identifiers are non-blank
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_id.trim().is_empty() {
            return Err(ValidationError::BlankField("sourceId".to_string()));
        }
        if self.target_id.trim().is_empty() {
            return Err(ValidationError::BlankField("targetId".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_serialization_contract() {
        let node = Node {
            id: 1,
            title: "Root".to_string(),
            description: None,
            x: 0.0,
            y: 0.0,
            color: Some("#FF5733".to_string()),
            node_type: NodeType::Idea,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            connection_ids: vec![2, 3],
        };

        let parsed: serde_json::Value = serde_json::to_value(&node).unwrap();

        // Flat camelCase shape with the enum tag under "type"
        assert_eq!(parsed.get("id").unwrap(), 1);
        assert_eq!(parsed.get("title").unwrap(), "Root");
        assert_eq!(parsed.get("type").unwrap(), "IDEA");
        assert_eq!(parsed.get("connectionIds").unwrap(), &json!([2, 3]));
        // Absent description is omitted, not null
        assert!(parsed.get("description").is_none());
    }

    #[test]
    fn test_draft_requires_position_and_type() {
        // Missing "y" and "type" must fail at deserialization
        let result: Result<NodeDraft, _> =
            serde_json::from_value(json!({ "title": "A", "x": 1.0 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_blank_title_rejected() {
        let draft = NodeDraft {
            title: "   ".to_string(),
            description: None,
            x: 0.0,
            y: 0.0,
            color: None,
            node_type: NodeType::Note,
        };
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::BlankField(f)) if f == "title"
        ));
    }

    #[test]
    fn test_patch_only_carries_supplied_fields() {
        let patch: NodePatch = serde_json::from_value(json!({ "color": "#00FF00" })).unwrap();
        assert_eq!(patch.color.as_deref(), Some("#00FF00"));
        assert!(patch.title.is_none());
        assert!(patch.x.is_none());
        assert!(patch.node_type.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_node_type_round_trip() {
        for tag in ["IDEA", "NOTE", "TASK", "QUESTION", "DECISION", "REFERENCE"] {
            let parsed: NodeType = tag.parse().unwrap();
            assert_eq!(parsed.as_str(), tag);
        }
        assert!("idea".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_connect_request_blank_ids() {
        let request = ConnectRequest {
            source_id: "".to_string(),
            target_id: "2".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
