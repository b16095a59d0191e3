mod discovery;
mod log_loader;
mod runner;
mod song_loader;

pub use discovery::discover_json_files;
pub use log_loader::{load_log_file, LogFileSummary};
pub use runner::{run_pipeline, PipelineStats};
pub use song_loader::load_song_file;
