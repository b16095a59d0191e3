use crate::records::{LogEvent, PlayEvent, TimeParts};
use crate::warehouse::{Songplay, SqliteWarehouse, TimeRow, User};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Counters reported back to the pipeline driver for one log file.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFileSummary {
    /// Playback events that survived the page filter.
    pub playback_events: usize,
    /// Distinct (user_id, level) pairs inserted.
    pub users: usize,
    /// Events the catalog lookup resolved to a song/artist pair.
    pub matched: usize,
}

/// Load one newline-delimited session log.
///
/// Page views are discarded; every surviving event produces one time
/// row and one songplay fact, and the user projection is deduplicated
/// by (user_id, level) with the last row in file order winning. A line
/// failing required-field extraction aborts the whole file.
pub fn load_log_file(store: &SqliteWarehouse, path: &Path) -> Result<LogFileSummary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file {}", path.display()))?;

    let mut events: Vec<PlayEvent> = Vec::new();
    for (line_index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = LogEvent::from_json(line)
            .with_context(|| format!("Invalid record at {}:{}", path.display(), line_index + 1))?;
        if !record.is_playback() {
            continue;
        }
        let event = PlayEvent::try_from(record)
            .with_context(|| format!("Invalid record at {}:{}", path.display(), line_index + 1))?;
        events.push(event);
    }

    // Time dimension: one row per event, duplicates tolerated
    for event in &events {
        let parts = TimeParts::from_epoch_ms(event.ts)
            .with_context(|| format!("Bad timestamp in {}", path.display()))?;
        store.insert_time_row(&TimeRow {
            start_time: event.ts,
            hour: parts.hour,
            day: parts.day,
            week: parts.week,
            month: parts.month,
            year: parts.year,
            weekday: parts.weekday,
        })?;
    }

    // User projection, deduplicated by (user_id, level); later rows in
    // file order overwrite earlier ones
    let mut users: BTreeMap<(i64, String), User> = BTreeMap::new();
    for event in &events {
        users.insert(
            (event.user_id, event.level.clone()),
            User {
                user_id: event.user_id,
                first_name: event.first_name.clone(),
                last_name: event.last_name.clone(),
                gender: event.gender.clone(),
                level: event.level.clone(),
            },
        );
    }
    for user in users.values() {
        store.insert_user(user)?;
    }

    // Songplay facts in original event order, resolving each event to
    // its catalog ids where possible
    let mut matched = 0usize;
    for event in &events {
        let resolved = match (&event.song, &event.artist, event.length) {
            (Some(song), Some(artist), Some(length)) => store.find_song(song, artist, length)?,
            _ => None,
        };
        if resolved.is_some() {
            matched += 1;
        }
        let (song_id, artist_id) = match resolved {
            Some((song_id, artist_id)) => (Some(song_id), Some(artist_id)),
            None => (None, None),
        };
        store.insert_songplay(&Songplay {
            start_time: event.ts,
            user_id: event.user_id,
            level: event.level.clone(),
            song_id,
            artist_id,
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        })?;
    }

    Ok(LogFileSummary {
        playback_events: events.len(),
        users: users.len(),
        matched,
    })
}
