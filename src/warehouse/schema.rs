//! Schema and statement catalog for the songplay warehouse.
//!
//! Five tables: three keyed dimensions (artists, songs, users) with
//! insert-or-ignore semantics, and two append-only tables (time,
//! songplays). Statement constants below are the only DML the store
//! executes.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, Schema, SqlType, Table};

// =============================================================================
// Tables
// =============================================================================

/// Artists dimension - one row per artist_id, never updated
const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    primary_key: &[],
};

const SONGS_FK_ARTISTS: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "artist_id",
};

/// Songs dimension - artist row must exist before the song row
const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&SONGS_FK_ARTISTS)
        ),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Real),
    ],
    primary_key: &[],
};

/// Users dimension - identity is (user_id, level), so a user whose
/// subscription level changes occupies two rows
const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("first_name", &SqlType::Text, non_null = true),
        sqlite_column!("last_name", &SqlType::Text, non_null = true),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text, non_null = true),
    ],
    primary_key: &["user_id", "level"],
};

/// Time dimension - append-only, one row per event even when
/// timestamps repeat
const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", &SqlType::Integer),
        sqlite_column!("hour", &SqlType::Integer, non_null = true),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!("week", &SqlType::Integer, non_null = true),
        sqlite_column!("month", &SqlType::Integer, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("weekday", &SqlType::Integer, non_null = true),
    ],
    primary_key: &[],
};

const SONGPLAYS_FK_SONGS: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "song_id",
};

const SONGPLAYS_FK_ARTISTS: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "artist_id",
};

/// Songplay facts - song_id/artist_id are NULL when the lookup missed
const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", &SqlType::Integer, non_null = true),
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text),
        sqlite_column!("song_id", &SqlType::Text, foreign_key = Some(&SONGPLAYS_FK_SONGS)),
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            foreign_key = Some(&SONGPLAYS_FK_ARTISTS)
        ),
        sqlite_column!("session_id", &SqlType::Integer),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    primary_key: &[],
};

/// Warehouse schema. Parents are listed before the tables referencing
/// them; `drop_all` walks the list in reverse.
pub const WAREHOUSE_SCHEMA: Schema = Schema {
    tables: &[
        ARTISTS_TABLE,
        SONGS_TABLE,
        USERS_TABLE,
        TIME_TABLE,
        SONGPLAYS_TABLE,
    ],
};

// =============================================================================
// Statement catalog
// =============================================================================

pub const ARTIST_INSERT: &str = "INSERT OR IGNORE INTO artists \
     (artist_id, name, location, latitude, longitude) VALUES (?1, ?2, ?3, ?4, ?5)";

pub const SONG_INSERT: &str = "INSERT OR IGNORE INTO songs \
     (song_id, title, artist_id, year, duration) VALUES (?1, ?2, ?3, ?4, ?5)";

pub const USER_INSERT: &str = "INSERT OR IGNORE INTO users \
     (user_id, first_name, last_name, gender, level) VALUES (?1, ?2, ?3, ?4, ?5)";

pub const TIME_INSERT: &str = "INSERT INTO time \
     (start_time, hour, day, week, month, year, weekday) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub const SONGPLAY_INSERT: &str = "INSERT INTO songplays \
     (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Resolve a play event to its catalog ids by exact match on
/// (title, artist name, duration).
pub const SONG_LOOKUP: &str = "SELECT songs.song_id, artists.artist_id FROM songs \
     JOIN artists ON songs.artist_id = artists.artist_id \
     WHERE songs.title = ?1 AND artists.name = ?2 AND songs.duration = ?3";
