//! Store errors

use thiserror::Error;

/// Errors raised by a database backend
#[derive(Error, Debug)]
pub enum DbError {
    /// The database could not be opened
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// A statement was rejected; the message carries the SQL where known
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// A statement named a relation the catalog does not have
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// BEGIN, COMMIT or ROLLBACK failed
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Another thread panicked while holding the connection
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result alias for store operations
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for catalog
        // errors, so classification inspects the message with narrow patterns.
        let msg = err.to_string();
        if msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
