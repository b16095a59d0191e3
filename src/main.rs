//! Songplay ETL
//!
//! This binary walks the configured song and log data directories and
//! loads every JSON file they contain into the warehouse database,
//! committing after each file.

use anyhow::{Context, Result};
use clap::Parser;
use songplay_etl::{run_pipeline, AppConfig, CliConfig, FileConfig, SqliteWarehouse};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "songplay-etl")]
#[command(about = "Load song metadata and session logs into the songplay warehouse")]
struct Args {
    /// Path to an optional TOML config file.
    #[arg(long, value_parser = parse_path)]
    config: Option<PathBuf>,

    /// Path to the SQLite warehouse database file.
    #[arg(long, value_parser = parse_path)]
    database: Option<PathBuf>,

    /// Root directory of the song-metadata files.
    #[arg(long = "song-data", value_parser = parse_path)]
    song_data_root: Option<PathBuf>,

    /// Root directory of the session log files.
    #[arg(long = "log-data", value_parser = parse_path)]
    log_data_root: Option<PathBuf>,

    /// Drop and recreate the warehouse tables before loading.
    #[arg(long, default_value_t = false)]
    recreate: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!(
        "Songplay ETL {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = args.config.as_deref().map(FileConfig::load).transpose()?;
    let cli = CliConfig {
        database: args.database,
        song_data_root: args.song_data_root,
        log_data_root: args.log_data_root,
    };
    let config = AppConfig::resolve(&cli, file_config)?;

    info!("Warehouse database: {}", config.database.display());
    info!("Song data root: {}", config.song_data_root.display());
    info!("Log data root: {}", config.log_data_root.display());

    let store = SqliteWarehouse::open(&config.database, args.recreate)?;

    let stats = run_pipeline(&store, &config)?;

    info!("Load Summary");
    info!("============");
    info!("Song files processed: {}", stats.song_files);
    info!("Log files processed: {}", stats.log_files);
    info!("Playback events loaded: {}", stats.playback_events);
    info!("Events resolved to catalog ids: {}", stats.matched_songplays);

    let counts = store.table_counts()?;
    info!("Warehouse contains:");
    info!("  {} artists", counts.artists);
    info!("  {} songs", counts.songs);
    info!("  {} users", counts.users);
    info!("  {} time rows", counts.time);
    info!("  {} songplays", counts.songplays);

    Ok(())
}
