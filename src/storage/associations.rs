//! Association manager - replace-all maintenance of game links
//!
//! Every function takes a plain `&Connection` so callers pass their open
//! `Transaction`. A failing statement returns early and the caller's
//! transaction rolls back on drop, so a partial link set is never committed.

use std::collections::HashSet;

use rusqlite::{params, Connection};
use rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY;

use crate::model::CompanyKind;
use crate::{Error, Result};
use super::is_constraint;

// ========== Company Links ==========

/// Replace every editor link of a game with `editor_ids`
pub fn replace_game_editors(conn: &Connection, game_id: i64, editor_ids: &[i64]) -> Result<()> {
    replace_links(conn, CompanyKind::Editor, game_id, editor_ids)
}

/// Replace every studio link of a game with `studio_ids`
pub fn replace_game_studios(conn: &Connection, game_id: i64, studio_ids: &[i64]) -> Result<()> {
    replace_links(conn, CompanyKind::Studio, game_id, studio_ids)
}

/// Delete all links of `kind` for the game, then insert one row per distinct id.
///
/// Duplicate ids keep their first occurrence. An id with no matching
/// company row fails with `NotFound`.
pub fn replace_links(conn: &Connection, kind: CompanyKind, game_id: i64, ids: &[i64]) -> Result<()> {
    conn.execute(
        &format!("DELETE FROM {} WHERE game_id = ?1", kind.link_table()),
        [game_id],
    )?;

    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (game_id, {}) VALUES (?1, ?2)",
        kind.link_table(),
        kind.link_column()
    ))?;

    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            continue;
        }
        stmt.execute(params![game_id, id]).map_err(|e| {
            if is_constraint(&e, SQLITE_CONSTRAINT_FOREIGNKEY) {
                Error::not_found(kind.label(), id)
            } else {
                Error::from(e)
            }
        })?;
    }

    tracing::debug!(game_id, kind = kind.label(), count = seen.len(), "replaced game links");
    Ok(())
}

/// Ids of the companies of `kind` linked to a game, in insertion order
pub fn linked_ids(conn: &Connection, kind: CompanyKind, game_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {} WHERE game_id = ?1 ORDER BY rowid",
        kind.link_column(),
        kind.link_table()
    ))?;

    let ids = stmt
        .query_map([game_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;

    Ok(ids)
}

pub fn editor_ids_for_game(conn: &Connection, game_id: i64) -> Result<Vec<i64>> {
    linked_ids(conn, CompanyKind::Editor, game_id)
}

pub fn studio_ids_for_game(conn: &Connection, game_id: i64) -> Result<Vec<i64>> {
    linked_ids(conn, CompanyKind::Studio, game_id)
}

/// Ids of the games linked to a company, ascending
pub fn game_ids_for_company(conn: &Connection, kind: CompanyKind, company_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT game_id FROM {} WHERE {} = ?1 ORDER BY game_id",
        kind.link_table(),
        kind.link_column()
    ))?;

    let ids = stmt
        .query_map([company_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;

    Ok(ids)
}

/// Remove every link pointing at a company (used when it is deleted)
pub fn clear_company_links(conn: &Connection, kind: CompanyKind, company_id: i64) -> Result<usize> {
    let removed = conn.execute(
        &format!("DELETE FROM {} WHERE {} = ?1", kind.link_table(), kind.link_column()),
        [company_id],
    )?;
    Ok(removed)
}

// ========== Genres ==========

/// Replace the genre list of a game, keeping input order
pub fn replace_game_genres(conn: &Connection, game_id: i64, genres: &[String]) -> Result<()> {
    conn.execute("DELETE FROM game_genre WHERE game_id = ?1", [game_id])?;

    let mut stmt = conn.prepare(
        "INSERT INTO game_genre (game_id, position, genre) VALUES (?1, ?2, ?3)"
    )?;
    for (position, genre) in genres.iter().enumerate() {
        stmt.execute(params![game_id, position as i64, genre])?;
    }
    Ok(())
}

pub fn genres_for_game(conn: &Connection, game_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT genre FROM game_genre WHERE game_id = ?1 ORDER BY position"
    )?;

    let genres = stmt
        .query_map([game_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(genres)
}

// ========== Bulk ==========

/// Remove every association and genre row of a game
pub fn clear_game_links(conn: &Connection, game_id: i64) -> Result<()> {
    for kind in CompanyKind::all() {
        conn.execute(
            &format!("DELETE FROM {} WHERE game_id = ?1", kind.link_table()),
            [game_id],
        )?;
    }
    conn.execute("DELETE FROM game_genre WHERE game_id = ?1", [game_id])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    fn seed(conn: &Connection) -> (i64, i64, i64) {
        conn.execute(
            "INSERT INTO game (name, publication_date, platform) VALUES ('Zelda', 1986, 'NES')",
            [],
        )
        .unwrap();
        let game = conn.last_insert_rowid();
        conn.execute("INSERT INTO editor (name) VALUES ('Nintendo')", []).unwrap();
        let nintendo = conn.last_insert_rowid();
        conn.execute("INSERT INTO editor (name) VALUES ('Capcom')", []).unwrap();
        let capcom = conn.last_insert_rowid();
        (game, nintendo, capcom)
    }

    #[test]
    fn test_replace_is_not_a_union() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        let (game, nintendo, capcom) = seed(&conn);

        replace_game_editors(&conn, game, &[nintendo]).unwrap();
        replace_game_editors(&conn, game, &[capcom]).unwrap();
        assert_eq!(editor_ids_for_game(&conn, game).unwrap(), vec![capcom]);

        replace_game_editors(&conn, game, &[]).unwrap();
        assert!(editor_ids_for_game(&conn, game).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_collapsed() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        let (game, nintendo, capcom) = seed(&conn);

        replace_game_editors(&conn, game, &[capcom, nintendo, capcom]).unwrap();
        assert_eq!(editor_ids_for_game(&conn, game).unwrap(), vec![capcom, nintendo]);
    }

    #[test]
    fn test_unknown_company_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        let (game, _, _) = seed(&conn);

        let err = replace_game_studios(&conn, game, &[999]).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Studio", ref id } if id == "999"));
    }

    #[test]
    fn test_genres_keep_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        let (game, _, _) = seed(&conn);

        let genres = vec!["Adventure".to_string(), "Action".to_string()];
        replace_game_genres(&conn, game, &genres).unwrap();
        assert_eq!(genres_for_game(&conn, game).unwrap(), genres);

        replace_game_genres(&conn, game, &["RPG".to_string()]).unwrap();
        assert_eq!(genres_for_game(&conn, game).unwrap(), vec!["RPG".to_string()]);
    }

    #[test]
    fn test_clear_game_links() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        let (game, nintendo, _) = seed(&conn);

        replace_game_editors(&conn, game, &[nintendo]).unwrap();
        replace_game_genres(&conn, game, &["Adventure".to_string()]).unwrap();
        clear_game_links(&conn, game).unwrap();

        assert!(editor_ids_for_game(&conn, game).unwrap().is_empty());
        assert!(genres_for_game(&conn, game).unwrap().is_empty());
        assert!(game_ids_for_company(&conn, CompanyKind::Editor, nintendo).unwrap().is_empty());
    }
}
