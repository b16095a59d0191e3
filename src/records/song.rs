use super::RecordError;
use crate::warehouse::{Artist, Song};
use serde::Deserialize;

/// One song-metadata document: a single JSON object describing a song
/// and its artist.
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct SongRecord {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub song_id: String,
    pub title: String,
    pub year: i32,
    pub duration: f64,
}

impl SongRecord {
    pub fn from_json(raw: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn artist_row(&self) -> Artist {
        Artist {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }

    pub fn song_row(&self) -> Song {
        Song {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }
}
