use serde::{Deserialize, Serialize};

/// A track as the player knows it.
///
/// `artist` may hold several artists joined with `;`. The JSON form uses
/// camelCase field names so snapshots written by older player builds decode
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub album_id: i64,
    pub artist_id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Duration in milliseconds.
    pub duration: u32,
    pub track_number: u32,
    pub path: String,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            id: 0,
            album_id: 0,
            artist_id: 0,
            title: "Title".to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            duration: 0,
            track_number: 0,
            path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub artist_id: i64,
    pub song_count: u32,
    pub year: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub album_count: u32,
    pub song_count: u32,
}

/// Header of the persisted playback queue: what was playing and where.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueueInfo {
    /// Id of the song that was current.
    pub id: i64,
    /// Playback position in milliseconds.
    pub seek_pos: i64,
    pub repeat_mode: i32,
    pub shuffle_mode: i32,
    pub state: i32,
    /// Queue title, e.g. the album or playlist it was started from.
    pub name: String,
}
