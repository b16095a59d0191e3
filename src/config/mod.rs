mod file_config;

pub use file_config::FileConfig;

use anyhow::Result;
use std::path::PathBuf;
use tracing::warn;

const DEFAULT_DATABASE: &str = "songplays.db";
const DEFAULT_SONG_DATA_ROOT: &str = "data/song_data";
const DEFAULT_LOG_DATA_ROOT: &str = "data/log_data";

/// CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub database: Option<PathBuf>,
    pub song_data_root: Option<PathBuf>,
    pub log_data_root: Option<PathBuf>,
}

/// Resolved pipeline configuration handed to the driver.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: PathBuf,
    pub song_data_root: PathBuf,
    pub log_data_root: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present; built-in
    /// defaults fill the rest.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let database = file
            .database
            .map(PathBuf::from)
            .or_else(|| cli.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

        let song_data_root = file
            .song_data_root
            .map(PathBuf::from)
            .or_else(|| cli.song_data_root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SONG_DATA_ROOT));

        let log_data_root = file
            .log_data_root
            .map(PathBuf::from)
            .or_else(|| cli.log_data_root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DATA_ROOT));

        // An absent root is not fatal, discovery just finds nothing there
        for root in [&song_data_root, &log_data_root] {
            if !root.is_dir() {
                warn!(
                    "Data root {:?} is not a directory, no files will be loaded from it",
                    root
                );
            }
        }

        Ok(AppConfig {
            database,
            song_data_root,
            log_data_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let config = AppConfig::resolve(&CliConfig::default(), None).unwrap();
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.song_data_root, PathBuf::from(DEFAULT_SONG_DATA_ROOT));
        assert_eq!(config.log_data_root, PathBuf::from(DEFAULT_LOG_DATA_ROOT));
    }

    #[test]
    fn file_config_overrides_cli() {
        let cli = CliConfig {
            database: Some(PathBuf::from("cli.db")),
            song_data_root: Some(PathBuf::from("cli_songs")),
            log_data_root: None,
        };
        let file = FileConfig {
            database: Some("file.db".to_string()),
            song_data_root: None,
            log_data_root: Some("file_logs".to_string()),
        };

        let config = AppConfig::resolve(&cli, Some(file)).unwrap();
        assert_eq!(config.database, PathBuf::from("file.db"));
        assert_eq!(config.song_data_root, PathBuf::from("cli_songs"));
        assert_eq!(config.log_data_root, PathBuf::from("file_logs"));
    }

    #[test]
    fn parses_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database = \"warehouse.db\"\nsong_data_root = \"songs\"\n",
        )
        .unwrap();

        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.database.as_deref(), Some("warehouse.db"));
        assert_eq!(file.song_data_root.as_deref(), Some("songs"));
        assert_eq!(file.log_data_root, None);
    }
}
