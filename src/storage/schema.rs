//! Database schema definitions

/// Pragmas applied to every pooled connection.
///
/// Foreign keys are off by default in SQLite and the setting is per
/// connection, so it cannot live in the schema statements.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL to create the game table
pub const CREATE_GAME_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS game (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    publication_date INTEGER,
    platform TEXT NOT NULL
)
"#;

/// SQL to create the game_genre table
/// Genres are kept in input order via `position`
pub const CREATE_GAME_GENRE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS game_genre (
    game_id INTEGER NOT NULL REFERENCES game(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    genre TEXT NOT NULL,
    PRIMARY KEY (game_id, position)
)
"#;

/// SQL to create the editor table
pub const CREATE_EDITOR_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS editor (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the studio table
pub const CREATE_STUDIO_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS studio (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the game_editor join table
pub const CREATE_GAME_EDITOR_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS game_editor (
    game_id INTEGER NOT NULL REFERENCES game(id) ON DELETE CASCADE,
    editor_id INTEGER NOT NULL REFERENCES editor(id) ON DELETE CASCADE,
    PRIMARY KEY (game_id, editor_id)
)
"#;

/// SQL to create the game_studio join table
pub const CREATE_GAME_STUDIO_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS game_studio (
    game_id INTEGER NOT NULL REFERENCES game(id) ON DELETE CASCADE,
    studio_id INTEGER NOT NULL REFERENCES studio(id) ON DELETE CASCADE,
    PRIMARY KEY (game_id, studio_id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_game_platform ON game(platform)",
    "CREATE INDEX IF NOT EXISTS idx_game_genre_genre ON game_genre(genre)",
    "CREATE INDEX IF NOT EXISTS idx_game_editor_editor ON game_editor(editor_id)",
    "CREATE INDEX IF NOT EXISTS idx_game_studio_studio ON game_studio(studio_id)",
];

/// All schema creation statements, parents before children
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_GAME_TABLE,
        CREATE_GAME_GENRE_TABLE,
        CREATE_EDITOR_TABLE,
        CREATE_STUDIO_TABLE,
        CREATE_GAME_EDITOR_TABLE,
        CREATE_GAME_STUDIO_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
