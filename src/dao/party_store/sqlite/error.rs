//! Error types shared by the SQLite storage implementation.

use thiserror::Error;

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The configured URL cannot be parsed into connection options.
    #[error("invalid SQLite URL `{url}`")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
    /// Opening the connection pool failed.
    #[error("failed to open SQLite database `{url}`")]
    Connect {
        /// URL as configured.
        url: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
    /// A schema statement was rejected at startup.
    #[error("failed to ensure SQLite schema object `{object}`")]
    Schema {
        /// Table or index being created.
        object: &'static str,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
    /// A query failed while executing `operation`.
    #[error("SQLite query `{operation}` failed")]
    Query {
        /// Store operation that failed.
        operation: &'static str,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
    /// Beginning, committing or rolling back a transaction failed.
    #[error("SQLite transaction for `{operation}` failed")]
    Transaction {
        /// Store operation that failed.
        operation: &'static str,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
    /// A stored value could not be decoded into the domain model.
    #[error("invalid value in column `{column}`: {reason}")]
    Decode {
        /// Offending column.
        column: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A row that must exist inside a transaction disappeared.
    #[error("row missing during `{operation}`")]
    MissingRow {
        /// Operation that expected the row.
        operation: &'static str,
    },
}

impl SqliteDaoError {
    pub(super) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| SqliteDaoError::Query { operation, source }
    }

    pub(super) fn transaction(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| SqliteDaoError::Transaction { operation, source }
    }
}
