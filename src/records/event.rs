use super::RecordError;
use chrono::{Datelike, TimeZone, Timelike, Utc};
use serde::Deserialize;

/// Page value that marks a playback event; every other page is a
/// plain page view and is discarded.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// Session logs carry the user id either as a JSON number or as a
/// numeric string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
enum UserIdField {
    Number(i64),
    Text(String),
}

/// One raw line of a session log. Only `page` is required at this
/// stage; field requirements are enforced when a line that survives
/// the page filter is converted into a [`PlayEvent`].
#[derive(Clone, Debug, Deserialize)]
pub struct LogEvent {
    pub page: String,
    pub ts: Option<i64>,
    #[serde(rename = "userId")]
    user_id: Option<UserIdField>,
    pub level: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<i64>,
    pub location: Option<String>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
}

impl LogEvent {
    pub fn from_json(raw: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn is_playback(&self) -> bool {
        self.page == NEXT_SONG_PAGE
    }
}

/// A validated playback event. `song`/`artist`/`length` stay optional
/// since they only feed the best-effort catalog lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEvent {
    pub ts: i64,
    pub user_id: i64,
    pub level: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl TryFrom<LogEvent> for PlayEvent {
    type Error = RecordError;

    fn try_from(event: LogEvent) -> Result<Self, Self::Error> {
        let user_id = match event.user_id {
            Some(UserIdField::Number(n)) => n,
            Some(UserIdField::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| RecordError::InvalidUserId(s))?,
            None => return Err(RecordError::MissingField("userId")),
        };

        Ok(PlayEvent {
            ts: event.ts.ok_or(RecordError::MissingField("ts"))?,
            user_id,
            level: event.level.ok_or(RecordError::MissingField("level"))?,
            first_name: event
                .first_name
                .ok_or(RecordError::MissingField("firstName"))?,
            last_name: event
                .last_name
                .ok_or(RecordError::MissingField("lastName"))?,
            gender: event.gender,
            song: event.song,
            artist: event.artist,
            length: event.length,
            session_id: event
                .session_id
                .ok_or(RecordError::MissingField("sessionId"))?,
            location: event.location,
            user_agent: event.user_agent,
        })
    }
}

/// A millisecond-epoch timestamp decomposed into the time-dimension
/// attributes. Weekday is Monday = 0; week is the ISO week number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeParts {
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

impl TimeParts {
    pub fn from_epoch_ms(ts: i64) -> Result<Self, RecordError> {
        let instant = Utc
            .timestamp_millis_opt(ts)
            .single()
            .ok_or(RecordError::InvalidTimestamp(ts))?;
        Ok(TimeParts {
            hour: instant.hour(),
            day: instant.day(),
            week: instant.iso_week().week(),
            month: instant.month(),
            year: instant.year(),
            weekday: instant.weekday().num_days_from_monday(),
        })
    }
}
