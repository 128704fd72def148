//! Database Connection Management
//!
//! This module provides the core database connection and initialization
//! functionality using libsql for MindMesh's node graph.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf
//! - **Idempotent schema**: `CREATE TABLE IF NOT EXISTS`, no migrations
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Foreign keys**: Enabled so node deletion cascades to its links
//!
//! # Connection Pattern
//!
//! Always use `connect_with_timeout()` in async functions. The 5-second busy
//! timeout lets concurrent operations wait and retry instead of failing
//! immediately with `SQLITE_BUSY` errors when the Tokio runtime moves
//! futures between threads.
//!
//! # Link Storage
//!
//! Links are undirected. Every pair is stored normalized (`a_id < b_id`)
//! with a composite primary key, so a duplicate connect attempt cannot
//! create a second row regardless of argument order.

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Database service for managing the libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use mindmesh_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_path = PathBuf::from("/path/to/mindmesh.db");
///     let db_service = DatabaseService::new(db_path).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database connection (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

/// Parameters for node insertion (avoids too-many-arguments lint)
pub struct DbCreateNodeParams<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub x: f64,
    pub y: f64,
    pub color: Option<&'a str>,
    pub node_type: &'a str,
}

/// Owned snapshot of a node row
///
/// Column values are copied out while the statement cursor is still live;
/// a `libsql::Row` is only valid until the cursor advances, so raw rows
/// must never outlive the query loop.
#[derive(Debug)]
pub struct DbNodeRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub x: f64,
    pub y: f64,
    pub color: Option<String>,
    pub node_type: String,
    pub created_at: String,
    pub updated_at: String,
}

impl DbNodeRow {
    /// Copy all columns out of a live row
    ///
    /// Expected columns (in order):
    /// id, title, description, x, y, color, node_type, created_at, updated_at
    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            x: row.get(3)?,
            y: row.get(4)?,
            color: row.get(5)?,
            node_type: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

/// Parameters for conditional field update (NULL keeps the stored value)
pub struct DbPatchNodeParams<'a> {
    pub id: i64,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<&'a str>,
    pub node_type: Option<&'a str>,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the parent directory cannot be created,
    /// the connection fails, or schema initialization fails.
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(DatabaseError::DirectoryCreationFailed)?;
            }
        }

        // Open database connection using Builder pattern
        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of
    /// execute(). This helper encapsulates that pattern.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Creates tables and indexes using CREATE TABLE IF NOT EXISTS,
    /// ensuring idempotent initialization (safe to call multiple times).
    ///
    /// # Schema
    ///
    /// - `nodes` table: node fields with a database-assigned rowid identifier
    /// - `node_links` table: normalized undirected pairs with cascade delete
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        // Enable WAL mode for better concurrency
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        // Enable foreign key constraints (link cascade on node delete)
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS nodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                x REAL NOT NULL,
                y REAL NOT NULL,
                color TEXT,
                node_type TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create nodes table: {}", e))
        })?;

        // Undirected links, stored normalized (a_id < b_id). The composite
        // primary key makes duplicate edges impossible at the storage level.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS node_links (
                a_id INTEGER NOT NULL,
                b_id INTEGER NOT NULL,
                PRIMARY KEY (a_id, b_id),
                CHECK (a_id < b_id),
                FOREIGN KEY (a_id) REFERENCES nodes(id) ON DELETE CASCADE,
                FOREIGN KEY (b_id) REFERENCES nodes(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create node_links table: {}", e))
        })?;

        // Index on node_type (most common filter)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_nodes_type ON nodes(node_type)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create index 'idx_nodes_type': {}", e))
        })?;

        // Index on the second link column (adjacency lookups scan both sides)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_links_b ON node_links(b_id)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create index 'idx_links_b': {}", e))
        })?;

        Ok(())
    }

    /// Get an async connection with busy timeout and foreign keys configured
    ///
    /// Use this for all async functions. The busy timeout makes SQLite wait
    /// up to 5s instead of failing immediately on lock; foreign keys must be
    /// re-enabled per connection for link cascade to apply.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.db.connect().map_err(DatabaseError::LibsqlError)?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        Ok(conn)
    }

    //
    // NODE STORE OPERATIONS
    // Core SQL logic, designed to be wrapped by the NodeStore trait
    // implementation. No business rules live here.
    //

    /// Insert a node and return its database-assigned identifier
    ///
    /// `created_at` and `updated_at` are set by the database.
    pub async fn db_create_node(
        &self,
        params: DbCreateNodeParams<'_>,
    ) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO nodes (title, description, x, y, color, node_type)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                params.title,
                params.description,
                params.x,
                params.y,
                params.color,
                params.node_type,
            ),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert node: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    /// Retrieve a single node row by ID
    ///
    /// Returns an owned row snapshot; the store layer converts it to a Node.
    pub async fn db_get_node(&self, id: i64) -> Result<Option<DbNodeRow>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, title, description, x, y, color, node_type, created_at, updated_at
                 FROM nodes WHERE id = ?",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare get_node query: {}", e))
            })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute get_node query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(DbNodeRow::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Check whether a node row exists
    pub async fn db_node_exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare("SELECT 1 FROM nodes WHERE id = ?")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare exists query: {}", e))
            })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute exists query: {}", e))
        })?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?;

        Ok(row.is_some())
    }

    /// Retrieve all node rows, ordered by identifier
    ///
    /// Each row is copied into an owned snapshot inside the query loop;
    /// raw rows are invalidated once the cursor advances.
    pub async fn db_list_nodes(&self) -> Result<Vec<DbNodeRow>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, title, description, x, y, color, node_type, created_at, updated_at
                 FROM nodes ORDER BY id",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare list query: {}", e))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute list query: {}", e))
        })?;

        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            out.push(DbNodeRow::from_row(&row)?);
        }

        Ok(out)
    }

    /// Replace all mutable fields of a node
    ///
    /// Returns the number of affected rows (0 when the node is missing).
    /// `updated_at` is refreshed by the database.
    pub async fn db_replace_node(
        &self,
        id: i64,
        params: DbCreateNodeParams<'_>,
    ) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let affected = conn
            .execute(
                "UPDATE nodes SET title = ?, description = ?, x = ?, y = ?, color = ?,
                        node_type = ?, updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                (
                    params.title,
                    params.description,
                    params.x,
                    params.y,
                    params.color,
                    params.node_type,
                    id,
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to update node: {}", e)))?;

        Ok(affected)
    }

    /// Update only the supplied fields of a node
    ///
    /// NULL parameters keep the stored value (COALESCE), mirroring the
    /// conditional-update contract of the service layer. Returns the number
    /// of affected rows.
    pub async fn db_patch_node(&self, params: DbPatchNodeParams<'_>) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let affected = conn
            .execute(
                "UPDATE nodes SET
                    title = COALESCE(?, title),
                    description = COALESCE(?, description),
                    x = COALESCE(?, x),
                    y = COALESCE(?, y),
                    color = COALESCE(?, color),
                    node_type = COALESCE(?, node_type),
                    updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                (
                    params.title,
                    params.description,
                    params.x,
                    params.y,
                    params.color,
                    params.node_type,
                    params.id,
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to patch node: {}", e)))?;

        Ok(affected)
    }

    /// Delete a node row
    ///
    /// Link rows referencing the node are removed by the foreign key
    /// cascade. Returns the number of affected node rows.
    pub async fn db_delete_node(&self, id: i64) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let affected = conn
            .execute("DELETE FROM nodes WHERE id = ?", [id])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete node: {}", e)))?;

        Ok(affected)
    }

    /// Get IDs of all nodes directly linked to the given node
    ///
    /// Links are stored normalized, so adjacency is the union of both
    /// columns.
    pub async fn db_connected_ids(&self, id: i64) -> Result<Vec<i64>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT b_id FROM node_links WHERE a_id = ?1
                 UNION
                 SELECT a_id FROM node_links WHERE b_id = ?1
                 ORDER BY 1",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare adjacency query: {}", e))
            })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute adjacency query: {}", e))
        })?;

        let mut ids = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            let connected: i64 = row
                .get(0)
                .map_err(|e| DatabaseError::sql_execution(e.to_string()))?;
            ids.push(connected);
        }

        Ok(ids)
    }

    /// Create an undirected link between two nodes
    ///
    /// The pair is normalized before insertion; `INSERT OR IGNORE` keeps the
    /// operation idempotent even under concurrent connect attempts.
    pub async fn db_create_link(&self, source: i64, target: i64) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let (a, b) = if source < target {
            (source, target)
        } else {
            (target, source)
        };

        conn.execute(
            "INSERT OR IGNORE INTO node_links (a_id, b_id) VALUES (?, ?)",
            [a, b],
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert link: {}", e)))?;

        Ok(())
    }
}
