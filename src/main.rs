//! Gamegraph CLI - serve the GraphQL catalog or inspect its database

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use gamegraph::config::{self, GamegraphConfig, Overrides, Settings};
use gamegraph::storage::SqliteStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gamegraph")]
#[command(version)]
#[command(about = "GraphQL API over a catalog of games, editors and studios")]
#[command(long_about = r#"
Gamegraph serves a GraphQL API (with a GraphiQL playground) over a SQLite
catalog of games, the editors that publish them and the studios that make them.

Example usage:
  gamegraph init
  gamegraph serve --port 8080
  gamegraph stats --database gamegraph.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./gamegraph.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the database and serve the GraphQL API
    Serve {
        /// Port to listen on (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show row counts of the catalog
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, database } => {
            let env_port = std::env::var("PORT").ok();
            let settings = Settings::resolve(
                Overrides { port, database },
                env_port.as_deref(),
                file_config,
            )?;
            tracing::info!("Opening database {:?} (pool size {})", settings.database, settings.pool_size);

            config::ensure_db_dir(&settings.database)?;
            let store = SqliteStore::open(&settings.database, settings.pool_size)?;
            println!("🗄️  Database: {:?}", settings.database);

            gamegraph::server::start_server(&settings, store).await?;
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &GamegraphConfig::starter(), force)?;
            println!("✅ Wrote config to {}", path.display());
        }

        Commands::Stats { database, json } => {
            let settings = Settings::resolve(
                Overrides { port: None, database },
                None,
                file_config,
            )?;
            let store = SqliteStore::open(&settings.database, 1)?;
            let stats = store.stats()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("📊 Gamegraph Statistics ({:?})", settings.database);
                println!("------------------------------------");
                println!("{}", stats);
            }
        }
    }

    Ok(())
}
