use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::DEFAULT_PAGE_SIZE;
use crate::storage::sqlite::DEFAULT_POOL_SIZE;

/// Port used when neither the CLI, `PORT` nor the config file sets one
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GamegraphConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub pool_size: Option<u32>,
    pub page_size: Option<u32>,
}

impl GamegraphConfig {
    /// Config written by `gamegraph init`, with every default spelled out
    pub fn starter() -> Self {
        Self {
            database: Some(default_database_path().to_string_lossy().into_owned()),
            port: Some(DEFAULT_PORT),
            pool_size: Some(DEFAULT_POOL_SIZE),
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("gamegraph.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("gamegraph.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<GamegraphConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: GamegraphConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &GamegraphConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Values given on the command line; they win over everything else
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub database: PathBuf,
    pub pool_size: u32,
    pub page_size: u32,
}

impl Settings {
    /// Merge sources. Port precedence: CLI, then `env_port` (the `PORT`
    /// variable), then the config file, then 8080.
    pub fn resolve(
        overrides: Overrides,
        env_port: Option<&str>,
        config: Option<GamegraphConfig>,
    ) -> anyhow::Result<Self> {
        let config = config.unwrap_or_default();

        let env_port = match env_port.map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .map_err(|e| anyhow::anyhow!("invalid PORT value {raw:?}: {e}"))?,
            ),
            None => None,
        };

        let port = overrides.port.or(env_port).or(config.port).unwrap_or(DEFAULT_PORT);
        let database = overrides
            .database
            .or_else(|| config.database.map(PathBuf::from))
            .unwrap_or_else(default_database_path);
        let pool_size = config.pool_size.filter(|n| *n > 0).unwrap_or(DEFAULT_POOL_SIZE);
        let page_size = config.page_size.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self { port, database, pool_size, page_size })
    }
}
