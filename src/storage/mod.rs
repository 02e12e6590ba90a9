//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - game(id, name, publication_date, platform)
//! - game_genre(game_id, position, genre)
//! - editor(id, name), studio(id, name)
//! - game_editor(game_id, editor_id), game_studio(game_id, studio_id)

pub mod associations;
pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, SqliteStore};

use std::os::raw::c_int;

/// Whether `err` is a constraint failure with the given extended result code
pub(crate) fn is_constraint(err: &rusqlite::Error, extended_code: c_int) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == extended_code)
}
