mod event;
mod song;

pub use event::{LogEvent, PlayEvent, TimeParts, NEXT_SONG_PAGE};
pub use song::SongRecord;

use thiserror::Error;

/// Errors that can occur while decoding input records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}
