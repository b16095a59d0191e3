//! Pipeline driver: discovery plus per-file loader invocation for the
//! two input categories, committing after every file.

use super::discovery::discover_json_files;
use super::log_loader::load_log_file;
use super::song_loader::load_song_file;
use crate::config::AppConfig;
use crate::warehouse::SqliteWarehouse;
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

/// Run totals reported at the end of a pipeline run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineStats {
    pub song_files: usize,
    pub log_files: usize,
    pub playback_events: usize,
    pub matched_songplays: usize,
}

/// Process the song category then the log category against an open
/// warehouse. Each file runs inside its own transaction: commit on
/// success, rollback and abort the run on failure, so a crash mid-file
/// never leaves that file's partial writes behind while earlier files
/// stay committed.
pub fn run_pipeline(store: &SqliteWarehouse, config: &AppConfig) -> Result<PipelineStats> {
    let song_files = process_category(store, &config.song_data_root, "song", |store, path| {
        load_song_file(store, path)
    })?;

    let mut playback_events = 0usize;
    let mut matched_songplays = 0usize;
    let log_files = process_category(store, &config.log_data_root, "log", |store, path| {
        let summary = load_log_file(store, path)?;
        playback_events += summary.playback_events;
        matched_songplays += summary.matched;
        Ok(())
    })?;

    Ok(PipelineStats {
        song_files,
        log_files,
        playback_events,
        matched_songplays,
    })
}

fn process_category<F>(
    store: &SqliteWarehouse,
    root: &Path,
    category: &str,
    mut load: F,
) -> Result<usize>
where
    F: FnMut(&SqliteWarehouse, &Path) -> Result<()>,
{
    let files = discover_json_files(root);
    info!("{} {} files found in {}", files.len(), category, root.display());

    let total = files.len();
    for (index, path) in files.iter().enumerate() {
        store.begin_file()?;
        match load(store, path) {
            Ok(()) => {
                store.commit_file()?;
                info!("{}/{} {} files processed", index + 1, total, category);
            }
            Err(e) => {
                if let Err(rollback_err) = store.rollback_file() {
                    warn!("Rollback failed after load error: {}", rollback_err);
                }
                return Err(e);
            }
        }
    }
    Ok(total)
}
