//! Songplay Warehouse ETL Library
//!
//! Loads song-metadata JSON files and newline-delimited session logs
//! into a normalized SQLite schema of dimension and fact tables.

pub mod config;
pub mod pipeline;
pub mod records;
pub mod sqlite_persistence;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig};
pub use pipeline::{run_pipeline, PipelineStats};
pub use warehouse::SqliteWarehouse;
