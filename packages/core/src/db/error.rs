//! Database Error Types
//!
//! Errors raised by [`crate::db::DatabaseService`] while opening the graph
//! database or running node and link statements. Business-rule failures
//! live in the service layer; everything here is storage plumbing.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-level errors for the node graph
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Could not open the database file
    #[error("Failed to connect to database at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Could not create the database's parent directory
    #[error("Failed to create parent directory for database: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// libsql operation error (connection handout, row decoding)
    #[error("Database operation failed: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// A node or link statement failed; context names the statement
    #[error("SQL execution failed: {context}")]
    SqlExecutionError { context: String },
}

impl DatabaseError {
    /// Create a connection failed error
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    /// Create a SQL execution error with context
    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }
}
