use crate::records::SongRecord;
use crate::warehouse::SqliteWarehouse;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load one song-metadata file: a single JSON object producing one
/// artist upsert followed by one song upsert. The artist goes first
/// since the song row carries a foreign key to it.
pub fn load_song_file(store: &SqliteWarehouse, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read song file {}", path.display()))?;
    let record = SongRecord::from_json(&raw)
        .with_context(|| format!("Invalid song record in {}", path.display()))?;

    store.insert_artist(&record.artist_row())?;
    store.insert_song(&record.song_row())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SONG_JSON: &str = r#"{"artist_id":"A1","artist_name":"Artist One","artist_location":"NYC","artist_latitude":40.7,"artist_longitude":-74.0,"song_id":"S1","title":"Song One","year":2000,"duration":180.5}"#;

    #[test]
    fn loads_artist_then_song() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");
        fs::write(&path, SONG_JSON).unwrap();

        let store = SqliteWarehouse::open_in_memory().unwrap();
        load_song_file(&store, &path).unwrap();

        let counts = store.table_counts().unwrap();
        assert_eq!(counts.artists, 1);
        assert_eq!(counts.songs, 1);
    }

    #[test]
    fn malformed_record_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");
        fs::write(&path, r#"{"artist_id": "A1"}"#).unwrap();

        let store = SqliteWarehouse::open_in_memory().unwrap();
        assert!(load_song_file(&store, &path).is_err());
    }
}
