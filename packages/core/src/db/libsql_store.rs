//! LibsqlStore - NodeStore Implementation for the libsql Backend
//!
//! This module implements the `NodeStore` trait for the embedded libsql
//! database, providing the persistence layer used in production and tests.
//!
//! # Design Principles
//!
//! 1. **Pure Delegation**: All SQL lives in DatabaseService `db_*` methods
//! 2. **Row Conversion**: Turns owned row snapshots into Node models
//! 3. **Adjacency on read**: Every returned node carries `connection_ids`
//!
//! # Examples
//!
//! ```rust,no_run
//! use mindmesh_core::db::{DatabaseService, LibsqlStore, NodeStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/test.db")).await?);
//!     let store: Arc<dyn NodeStore> = Arc::new(LibsqlStore::new(db));
//!
//!     let node = store.get_node(1).await?;
//!     Ok(())
//! }
//! ```

use crate::db::node_store::NodeStore;
use crate::db::{DatabaseService, DbCreateNodeParams, DbNodeRow, DbPatchNodeParams};
use crate::models::{Node, NodeDraft, NodePatch};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;

/// LibsqlStore implements the NodeStore trait for the libsql backend
pub struct LibsqlStore {
    /// Underlying database service (extracted SQL operations)
    db: Arc<DatabaseService>,
}

impl LibsqlStore {
    /// Create a new LibsqlStore wrapper
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Parse timestamp from database - handles both SQLite and RFC3339 formats
    ///
    /// SQLite CURRENT_TIMESTAMP returns: "YYYY-MM-DD HH:MM:SS"
    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(anyhow::anyhow!(
            "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
            s
        ))
    }

    /// Convert an owned row snapshot to the Node model
    ///
    /// This is the central conversion point for all query operations.
    /// `connection_ids` is filled in separately by the caller.
    fn row_to_node(row: DbNodeRow) -> Result<Node> {
        let node_type = row
            .node_type
            .parse::<crate::models::NodeType>()
            .with_context(|| format!("Unknown node_type '{}' in row {}", row.node_type, row.id))?;

        let created_at =
            Self::parse_timestamp(&row.created_at).context("Failed to parse created_at")?;
        let updated_at =
            Self::parse_timestamp(&row.updated_at).context("Failed to parse updated_at")?;

        Ok(Node {
            id: row.id,
            title: row.title,
            description: row.description,
            x: row.x,
            y: row.y,
            color: row.color,
            node_type,
            created_at,
            updated_at,
            connection_ids: Vec::new(),
        })
    }

    /// Fetch a node by ID and attach its adjacency list
    async fn hydrate_node(&self, id: i64) -> Result<Option<Node>> {
        let row = match self.db.db_get_node(id).await? {
            Some(row) => row,
            None => return Ok(None),
        };

        let mut node = Self::row_to_node(row)?;
        node.connection_ids = self.db.db_connected_ids(id).await?;
        Ok(Some(node))
    }
}

#[async_trait]
impl NodeStore for LibsqlStore {
    async fn create_node(&self, draft: NodeDraft) -> Result<Node> {
        let id = self
            .db
            .db_create_node(DbCreateNodeParams {
                title: &draft.title,
                description: draft.description.as_deref(),
                x: draft.x,
                y: draft.y,
                color: draft.color.as_deref(),
                node_type: draft.node_type.as_str(),
            })
            .await?;

        self.hydrate_node(id)
            .await?
            .context("Created node vanished before readback")
    }

    async fn get_node(&self, id: i64) -> Result<Option<Node>> {
        self.hydrate_node(id).await
    }

    async fn node_exists(&self, id: i64) -> Result<bool> {
        Ok(self.db.db_node_exists(id).await?)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        let rows = self.db.db_list_nodes().await?;

        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            let mut node = Self::row_to_node(row)?;
            node.connection_ids = self.db.db_connected_ids(node.id).await?;
            nodes.push(node);
        }

        Ok(nodes)
    }

    async fn replace_node(&self, id: i64, draft: NodeDraft) -> Result<Option<Node>> {
        let affected = self
            .db
            .db_replace_node(
                id,
                DbCreateNodeParams {
                    title: &draft.title,
                    description: draft.description.as_deref(),
                    x: draft.x,
                    y: draft.y,
                    color: draft.color.as_deref(),
                    node_type: draft.node_type.as_str(),
                },
            )
            .await?;

        if affected == 0 {
            return Ok(None);
        }

        self.hydrate_node(id).await
    }

    async fn patch_node(&self, id: i64, patch: NodePatch) -> Result<Option<Node>> {
        let affected = self
            .db
            .db_patch_node(DbPatchNodeParams {
                id,
                title: patch.title.as_deref(),
                description: patch.description.as_deref(),
                x: patch.x,
                y: patch.y,
                color: patch.color.as_deref(),
                node_type: patch.node_type.map(|t| t.as_str()),
            })
            .await?;

        if affected == 0 {
            return Ok(None);
        }

        self.hydrate_node(id).await
    }

    async fn delete_node(&self, id: i64) -> Result<bool> {
        let affected = self.db.db_delete_node(id).await?;
        Ok(affected > 0)
    }

    async fn connected_ids(&self, id: i64) -> Result<Vec<i64>> {
        Ok(self.db.db_connected_ids(id).await?)
    }

    async fn create_link(&self, source: i64, target: i64) -> Result<()> {
        Ok(self.db.db_create_link(source, target).await?)
    }
}
