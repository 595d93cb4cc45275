use std::time::Duration;

use thiserror::Error;

/// Errors produced by configuration loading, the connection manager and the
/// client repository.
#[derive(Error, Debug)]
pub enum DbError {
    /// A required environment variable is missing or malformed
    #[error("invalid database configuration: {0}")]
    Config(#[from] envy::Error),

    /// The .env file exists but could not be read
    #[error("error loading .env file: {0}")]
    Env(#[source] dotenvy::Error),

    #[error("error opening database: {source}")]
    Connect {
        #[source]
        source: sqlx::Error,
    },

    #[error("error connecting to database: {source}")]
    Ping {
        #[source]
        source: sqlx::Error,
    },

    /// A repository was requested before the connection was initialized
    #[error("database connection is not initialized")]
    NotConnected,

    #[error("{field} is a required field")]
    Validation { field: &'static str },

    #[error("client with id {id} not found")]
    NotFound { id: i64 },

    #[error("{operation} took longer than {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("error looking up client {id}: {source}")]
    Lookup {
        id: i64,
        #[source]
        source: sqlx::Error,
    },

    #[error("{operation} failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Startup errors leave the process without a usable connection.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DbError::Config(_)
                | DbError::Env(_)
                | DbError::Connect { .. }
                | DbError::Ping { .. }
                | DbError::NotConnected
        )
    }

    pub(crate) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| DbError::Query { operation, source }
    }
}
