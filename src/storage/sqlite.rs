//! SQLite storage implementation

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;

use crate::model::{Company, CompanyKind, Game, GameFields, GamePage, GameQuery};
use crate::{Error, Result};
use super::{associations, is_constraint, schema};

/// Default number of pooled connections for file databases
pub const DEFAULT_POOL_SIZE: u32 = 8;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const GAME_COLUMNS: &str = "g.id, g.name, g.publication_date, g.platform";

type PooledSqlite = PooledConnection<SqliteConnectionManager>;

/// SQLite-backed storage for the game catalog.
///
/// Cloning is cheap: clones share one connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path, pool_size: u32) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(init_connection);
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;
        Self::from_pool(pool)
    }

    /// Open an in-memory database (for testing)
    ///
    /// Every SQLite memory connection is its own database, so the pool holds
    /// exactly one connection and never recycles it.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(init_connection);
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;
        Self::from_pool(pool)
    }

    fn from_pool(pool: Pool<SqliteConnectionManager>) -> Result<Self> {
        let store = Self { pool };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Check out a pooled connection
    pub fn connection(&self) -> Result<PooledSqlite> {
        Ok(self.pool.get()?)
    }

    // ========== Game Operations ==========

    /// List games matching the query filters, one page at a time
    pub fn list_games(&self, query: &GameQuery) -> Result<GamePage> {
        let conn = self.connection()?;
        let (filter, mut args) = game_filter(query);

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM game g{filter}"),
            params_from_iter(args.iter()),
            |row| row.get(0),
        )?;

        args.push(Value::Integer(i64::from(query.page_size)));
        args.push(Value::Integer(i64::try_from(query.offset()).unwrap_or(i64::MAX)));

        let mut stmt = conn.prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM game g{filter} ORDER BY g.id LIMIT ? OFFSET ?"
        ))?;
        let mut games = stmt
            .query_map(params_from_iter(args.iter()), row_to_game)?
            .collect::<rusqlite::Result<Vec<Game>>>()?;

        for game in &mut games {
            load_game_links(&conn, game)?;
        }

        tracing::debug!(total, page = query.page, returned = games.len(), "listed games");
        Ok(GamePage {
            games,
            total: total.max(0) as u64,
            page: query.page,
            page_size: query.page_size,
        })
    }

    /// Get a game by id
    pub fn get_game(&self, id: i64) -> Result<Game> {
        let conn = self.connection()?;
        read_game(&conn, id)
    }

    /// Insert a game with its genres and links in one transaction
    pub fn create_game(&self, fields: &GameFields) -> Result<Game> {
        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO game (name, publication_date, platform) VALUES (?1, ?2, ?3)",
            params![fields.name, fields.publication_date, fields.platform],
        )?;
        let id = tx.last_insert_rowid();
        write_game_links(&tx, id, fields)?;

        let game = read_game(&tx, id)?;
        tx.commit()?;

        tracing::info!(game_id = id, name = %game.name, "created game");
        Ok(game)
    }

    /// Overwrite a game and replace its genres and links in one transaction
    pub fn update_game(&self, id: i64, fields: &GameFields) -> Result<Game> {
        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE game SET name = ?1, publication_date = ?2, platform = ?3 WHERE id = ?4",
            params![fields.name, fields.publication_date, fields.platform, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Game", id));
        }
        write_game_links(&tx, id, fields)?;

        let game = read_game(&tx, id)?;
        tx.commit()?;

        tracing::info!(game_id = id, "updated game");
        Ok(game)
    }

    /// Delete a game together with its genre and association rows
    pub fn delete_game(&self, id: i64) -> Result<i64> {
        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        associations::clear_game_links(&tx, id)?;
        let removed = tx.execute("DELETE FROM game WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(Error::not_found("Game", id));
        }
        tx.commit()?;

        tracing::info!(game_id = id, "deleted game");
        Ok(id)
    }

    // ========== Company Operations ==========

    /// List all editors or studios, ordered by id
    pub fn list_companies(&self, kind: CompanyKind) -> Result<Vec<Company>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT id, name FROM {} ORDER BY id", kind.table()))?;

        let companies = stmt
            .query_map([], row_to_company)?
            .collect::<rusqlite::Result<Vec<Company>>>()?;

        Ok(companies)
    }

    pub fn get_company(&self, kind: CompanyKind, id: i64) -> Result<Company> {
        let conn = self.connection()?;
        read_company(&conn, kind, id)
    }

    /// Insert a company; the unique name index rejects duplicates atomically
    pub fn create_company(&self, kind: CompanyKind, name: &str) -> Result<Company> {
        let conn = self.connection()?;
        conn.execute(&format!("INSERT INTO {} (name) VALUES (?1)", kind.table()), [name])
            .map_err(|e| name_conflict(e, kind, name))?;

        let company = Company { id: conn.last_insert_rowid(), name: name.to_string() };
        tracing::info!(kind = kind.label(), id = company.id, name, "created company");
        Ok(company)
    }

    pub fn update_company(&self, kind: CompanyKind, id: i64, name: &str) -> Result<Company> {
        let conn = self.connection()?;
        let changed = conn
            .execute(&format!("UPDATE {} SET name = ?1 WHERE id = ?2", kind.table()), params![name, id])
            .map_err(|e| name_conflict(e, kind, name))?;
        if changed == 0 {
            return Err(Error::not_found(kind.label(), id));
        }

        tracing::info!(kind = kind.label(), id, name, "updated company");
        read_company(&conn, kind, id)
    }

    /// Delete a company and every game link pointing at it
    pub fn delete_company(&self, kind: CompanyKind, id: i64) -> Result<i64> {
        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let unlinked = associations::clear_company_links(&tx, kind, id)?;
        let removed = tx.execute(&format!("DELETE FROM {} WHERE id = ?1", kind.table()), [id])?;
        if removed == 0 {
            return Err(Error::not_found(kind.label(), id));
        }
        tx.commit()?;

        tracing::info!(kind = kind.label(), id, unlinked, "deleted company");
        Ok(id)
    }

    /// Games linked to a company
    pub fn games_for_company(&self, kind: CompanyKind, id: i64) -> Result<Vec<Game>> {
        let conn = self.connection()?;
        associations::game_ids_for_company(&conn, kind, id)?
            .into_iter()
            .map(|game_id| read_game(&conn, game_id))
            .collect()
    }

    pub fn list_editors(&self) -> Result<Vec<Company>> {
        self.list_companies(CompanyKind::Editor)
    }

    pub fn get_editor(&self, id: i64) -> Result<Company> {
        self.get_company(CompanyKind::Editor, id)
    }

    pub fn create_editor(&self, name: &str) -> Result<Company> {
        self.create_company(CompanyKind::Editor, name)
    }

    pub fn update_editor(&self, id: i64, name: &str) -> Result<Company> {
        self.update_company(CompanyKind::Editor, id, name)
    }

    pub fn delete_editor(&self, id: i64) -> Result<i64> {
        self.delete_company(CompanyKind::Editor, id)
    }

    pub fn list_studios(&self) -> Result<Vec<Company>> {
        self.list_companies(CompanyKind::Studio)
    }

    pub fn get_studio(&self, id: i64) -> Result<Company> {
        self.get_company(CompanyKind::Studio, id)
    }

    pub fn create_studio(&self, name: &str) -> Result<Company> {
        self.create_company(CompanyKind::Studio, name)
    }

    pub fn update_studio(&self, id: i64, name: &str) -> Result<Company> {
        self.update_company(CompanyKind::Studio, id, name)
    }

    pub fn delete_studio(&self, id: i64) -> Result<i64> {
        self.delete_company(CompanyKind::Studio, id)
    }

    // ========== Statistics ==========

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let conn = self.connection()?;
        let count = |table: &str| -> Result<usize> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n as usize)
        };

        Ok(DbStats {
            games: count("game")?,
            editors: count("editor")?,
            studios: count("studio")?,
            game_editors: count("game_editor")?,
            game_studios: count("game_studio")?,
        })
    }
}

fn init_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(schema::CONNECTION_PRAGMAS)
}

/// Build the WHERE clause and its positional arguments for a game listing
fn game_filter(query: &GameQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut args = Vec::new();

    if let Some(platform) = &query.platform {
        clauses.push("g.platform = ?");
        args.push(Value::Text(platform.clone()));
    }
    if let Some(genre) = &query.genre {
        clauses.push("EXISTS (SELECT 1 FROM game_genre gg WHERE gg.game_id = g.id AND gg.genre = ?)");
        args.push(Value::Text(genre.clone()));
    }
    if let Some(studio) = &query.studio {
        clauses.push(
            "EXISTS (SELECT 1 FROM game_studio gs JOIN studio s ON s.id = gs.studio_id \
             WHERE gs.game_id = g.id AND s.name = ?)",
        );
        args.push(Value::Text(studio.clone()));
    }

    if clauses.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), args)
    }
}

/// Entity row first, then the rows that reference it
fn write_game_links(conn: &Connection, id: i64, fields: &GameFields) -> Result<()> {
    associations::replace_game_genres(conn, id, &fields.genres)?;
    associations::replace_game_editors(conn, id, &fields.editor_ids)?;
    associations::replace_game_studios(conn, id, &fields.studio_ids)?;
    Ok(())
}

fn read_game(conn: &Connection, id: i64) -> Result<Game> {
    let mut game = conn
        .query_row(
            &format!("SELECT {GAME_COLUMNS} FROM game g WHERE g.id = ?1"),
            [id],
            row_to_game,
        )
        .optional()?
        .ok_or_else(|| Error::not_found("Game", id))?;

    load_game_links(conn, &mut game)?;
    Ok(game)
}

fn load_game_links(conn: &Connection, game: &mut Game) -> Result<()> {
    game.genres = associations::genres_for_game(conn, game.id)?;
    game.editor_ids = associations::editor_ids_for_game(conn, game.id)?;
    game.studio_ids = associations::studio_ids_for_game(conn, game.id)?;
    Ok(())
}

/// Helper to convert a row to a Game (links are loaded separately)
fn row_to_game(row: &rusqlite::Row) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        name: row.get(1)?,
        genres: Vec::new(),
        publication_date: row.get(2)?,
        platform: row.get(3)?,
        editor_ids: Vec::new(),
        studio_ids: Vec::new(),
    })
}

fn read_company(conn: &Connection, kind: CompanyKind, id: i64) -> Result<Company> {
    conn.query_row(
        &format!("SELECT id, name FROM {} WHERE id = ?1", kind.table()),
        [id],
        row_to_company,
    )
    .optional()?
    .ok_or_else(|| Error::not_found(kind.label(), id))
}

fn row_to_company(row: &rusqlite::Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn name_conflict(err: rusqlite::Error, kind: CompanyKind, name: &str) -> Error {
    if is_constraint(&err, SQLITE_CONSTRAINT_UNIQUE) {
        Error::AlreadyExists { entity: kind.label(), name: name.to_string() }
    } else {
        Error::from(err)
    }
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub games: usize,
    pub editors: usize,
    pub studios: usize,
    pub game_editors: usize,
    pub game_studios: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Games: {}", self.games)?;
        writeln!(f, "  Editors: {}", self.editors)?;
        writeln!(f, "  Studios: {}", self.studios)?;
        writeln!(f, "  Game/Editor links: {}", self.game_editors)?;
        writeln!(f, "  Game/Studio links: {}", self.game_studios)
    }
}
