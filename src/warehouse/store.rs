//! SQLite-backed warehouse store.
//!
//! Owns the single connection used for an entire pipeline run. All DML
//! goes through the statement catalog in `schema.rs`; the per-file
//! commit boundary is exposed as `begin_file`/`commit_file`/
//! `rollback_file` for the pipeline driver to bracket each input file.

use super::models::{Artist, Song, Songplay, TimeRow, User};
use super::schema::{self, WAREHOUSE_SCHEMA};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

pub struct SqliteWarehouse {
    conn: Connection,
}

/// Per-table row counts, used for the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub artists: i64,
    pub songs: i64,
    pub users: i64,
    pub time: i64,
    pub songplays: i64,
}

impl SqliteWarehouse {
    /// Open (or create) the warehouse database at `db_path`.
    ///
    /// With `recreate` the five tables are dropped in dependency order
    /// and built from scratch; otherwise creation is idempotent.
    pub fn open<P: AsRef<Path>>(db_path: P, recreate: bool) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path.as_ref(),
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open warehouse database")?;

        Self::init(conn, recreate)
    }

    /// In-memory warehouse, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, false)
    }

    fn init(conn: Connection, recreate: bool) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        if recreate {
            info!("Dropping existing warehouse tables");
            WAREHOUSE_SCHEMA.drop_all(&conn)?;
        }
        WAREHOUSE_SCHEMA.create_all(&conn)?;
        Ok(SqliteWarehouse { conn })
    }

    // =========================================================================
    // File-granular transaction boundary
    // =========================================================================

    pub fn begin_file(&self) -> Result<()> {
        self.conn.execute("BEGIN IMMEDIATE", [])?;
        Ok(())
    }

    pub fn commit_file(&self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    pub fn rollback_file(&self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    // =========================================================================
    // Inserts
    // =========================================================================

    /// Insert an artist; a row with the same artist_id already present
    /// wins and the new one is discarded.
    pub fn insert_artist(&self, artist: &Artist) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(schema::ARTIST_INSERT)?;
        stmt.execute(params![
            &artist.artist_id,
            &artist.name,
            &artist.location,
            artist.latitude,
            artist.longitude,
        ])?;
        Ok(())
    }

    /// Insert a song; the referenced artist row must already exist.
    pub fn insert_song(&self, song: &Song) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(schema::SONG_INSERT)?;
        stmt.execute(params![
            &song.song_id,
            &song.title,
            &song.artist_id,
            song.year,
            song.duration,
        ])?;
        Ok(())
    }

    pub fn insert_user(&self, user: &User) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(schema::USER_INSERT)?;
        stmt.execute(params![
            user.user_id,
            &user.first_name,
            &user.last_name,
            &user.gender,
            &user.level,
        ])?;
        Ok(())
    }

    pub fn insert_time_row(&self, row: &TimeRow) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(schema::TIME_INSERT)?;
        stmt.execute(params![
            row.start_time,
            row.hour,
            row.day,
            row.week,
            row.month,
            row.year,
            row.weekday,
        ])?;
        Ok(())
    }

    pub fn insert_songplay(&self, play: &Songplay) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(schema::SONGPLAY_INSERT)?;
        stmt.execute(params![
            play.start_time,
            play.user_id,
            &play.level,
            &play.song_id,
            &play.artist_id,
            play.session_id,
            &play.location,
            &play.user_agent,
        ])?;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Resolve (title, artist name, duration) to (song_id, artist_id).
    /// A miss returns `Ok(None)`.
    pub fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<(String, String)>> {
        let mut stmt = self.conn.prepare_cached(schema::SONG_LOOKUP)?;
        match stmt.query_row(params![title, artist_name, duration], |r| {
            Ok((r.get(0)?, r.get(1)?))
        }) {
            Ok(pair) => Ok(Some(pair)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            artists: self.count_rows("artists")?,
            songs: self.count_rows("songs")?,
            users: self.count_rows("users")?,
            time: self.count_rows("time")?,
            songplays: self.count_rows("songplays")?,
        })
    }

    fn count_rows(&self, table: &str) -> Result<i64> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_artist() -> Artist {
        Artist {
            artist_id: "A1".to_string(),
            name: "Artist One".to_string(),
            location: Some("NYC".to_string()),
            latitude: Some(40.7),
            longitude: Some(-74.0),
        }
    }

    fn sample_song() -> Song {
        Song {
            song_id: "S1".to_string(),
            title: "Song One".to_string(),
            artist_id: "A1".to_string(),
            year: 2000,
            duration: 180.5,
        }
    }

    #[test]
    fn find_song_hit_and_miss() {
        let store = SqliteWarehouse::open_in_memory().unwrap();
        store.insert_artist(&sample_artist()).unwrap();
        store.insert_song(&sample_song()).unwrap();

        let hit = store.find_song("Song One", "Artist One", 180.5).unwrap();
        assert_eq!(hit, Some(("S1".to_string(), "A1".to_string())));

        let miss = store.find_song("Song One", "Somebody Else", 180.5).unwrap();
        assert_eq!(miss, None);
    }

    #[test]
    fn repeated_dimension_inserts_keep_one_row() {
        let store = SqliteWarehouse::open_in_memory().unwrap();
        for _ in 0..3 {
            store.insert_artist(&sample_artist()).unwrap();
            store.insert_song(&sample_song()).unwrap();
        }
        let counts = store.table_counts().unwrap();
        assert_eq!(counts.artists, 1);
        assert_eq!(counts.songs, 1);
    }

    #[test]
    fn rollback_discards_file_writes() {
        let store = SqliteWarehouse::open_in_memory().unwrap();

        store.begin_file().unwrap();
        store.insert_artist(&sample_artist()).unwrap();
        store.rollback_file().unwrap();
        assert_eq!(store.table_counts().unwrap().artists, 0);

        store.begin_file().unwrap();
        store.insert_artist(&sample_artist()).unwrap();
        store.commit_file().unwrap();
        assert_eq!(store.table_counts().unwrap().artists, 1);
    }

    #[test]
    fn reopen_keeps_existing_rows_unless_recreate() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("warehouse.db");

        {
            let store = SqliteWarehouse::open(&db_path, false).unwrap();
            store.insert_artist(&sample_artist()).unwrap();
        }
        {
            let store = SqliteWarehouse::open(&db_path, false).unwrap();
            assert_eq!(store.table_counts().unwrap().artists, 1);
        }
        {
            let store = SqliteWarehouse::open(&db_path, true).unwrap();
            assert_eq!(store.table_counts().unwrap().artists, 0);
        }
    }
}
