//! # Gamegraph - GraphQL catalog of games, editors and studios
//!
//! Gamegraph provides:
//! - SQLite-backed storage for games, editors, studios and their links
//! - Transactional writes with replace-all association semantics
//! - A GraphQL schema (queries + mutations) over that storage
//! - An axum server with a GraphiQL playground

pub mod model;
pub mod storage;
pub mod graphql;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use model::{Company, Game, GameFields, GamePage, GameQuery};
pub use storage::SqliteStore;

/// Result type alias for Gamegraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Gamegraph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} with the name already exists: {name}")]
    AlreadyExists { entity: &'static str, name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound { entity, id: id.to_string() }
    }

    /// Whether the error is caused by the request rather than the backend
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::AlreadyExists { .. } | Error::InvalidInput(_)
        )
    }
}
