//! Every persisted preference, with its key, kind and default in one place.

use std::collections::HashSet;

use crate::models::Song;
use crate::storage::{PrefKind, PrefValue};

use super::modes::{AlbumSortOrder, ArtistSortOrder, SongSortOrder, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pref {
    StartPageIndex,
    SongSortOrder,
    AlbumSortOrder,
    AlbumSongSortOrder,
    ArtistSortOrder,
    CurrentTheme,
    CurrentSongSelected,
    CurrentQueueInfo,
    CurrentQueueList,
    DidStop,
}

impl Pref {
    pub const ALL: &'static [Pref] = &[
        Pref::StartPageIndex,
        Pref::SongSortOrder,
        Pref::AlbumSortOrder,
        Pref::AlbumSongSortOrder,
        Pref::ArtistSortOrder,
        Pref::CurrentTheme,
        Pref::CurrentSongSelected,
        Pref::CurrentQueueInfo,
        Pref::CurrentQueueList,
        Pref::DidStop,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Pref::StartPageIndex => "last_option_selected",
            Pref::SongSortOrder => "song_sort_order",
            Pref::AlbumSortOrder => "album_sort_order",
            Pref::AlbumSongSortOrder => "album_song_sort_order",
            Pref::ArtistSortOrder => "artist_sort_order",
            Pref::CurrentTheme => "current_theme",
            Pref::CurrentSongSelected => "song_key",
            Pref::CurrentQueueInfo => "queue_info_key",
            Pref::CurrentQueueList => "queue_list_key",
            Pref::DidStop => "did_stop_key",
        }
    }

    pub fn from_key(key: &str) -> Option<Pref> {
        Pref::ALL.iter().copied().find(|p| p.key() == key)
    }

    pub fn kind(self) -> PrefKind {
        match self {
            Pref::StartPageIndex => PrefKind::Int,
            Pref::DidStop => PrefKind::Bool,
            _ => PrefKind::Str,
        }
    }

    /// `None` means the preference has no value until first written.
    pub fn default_value(self) -> Option<PrefValue> {
        let v = match self {
            Pref::StartPageIndex => PrefValue::Int(2),
            Pref::SongSortOrder => PrefValue::Str(SongSortOrder::AZ.as_str().into()),
            Pref::AlbumSortOrder => PrefValue::Str(AlbumSortOrder::AZ.as_str().into()),
            Pref::AlbumSongSortOrder => PrefValue::Str(SongSortOrder::Track.as_str().into()),
            Pref::ArtistSortOrder => PrefValue::Str(ArtistSortOrder::AZ.as_str().into()),
            Pref::CurrentTheme => PrefValue::Str(Theme::Auto.as_str().into()),
            Pref::CurrentSongSelected => PrefValue::Str(default_song_json()),
            Pref::CurrentQueueInfo | Pref::CurrentQueueList => return None,
            Pref::DidStop => PrefValue::Bool(false),
        };
        Some(v)
    }

    /// Whether `raw` is an accepted value for enum-string preferences.
    /// Free-form preferences accept anything.
    pub fn accepts(self, raw: &str) -> bool {
        match self {
            Pref::SongSortOrder | Pref::AlbumSongSortOrder => {
                SongSortOrder::from_stored(raw).is_some()
            }
            Pref::AlbumSortOrder => AlbumSortOrder::from_stored(raw).is_some(),
            Pref::ArtistSortOrder => ArtistSortOrder::from_stored(raw).is_some(),
            Pref::CurrentTheme => Theme::from_stored(raw).is_some(),
            _ => true,
        }
    }
}

pub(crate) fn default_song_json() -> String {
    serde_json::to_string(&Song::default()).unwrap_or_else(|_| "{}".to_string())
}

/// Check the table above for drift: unique keys, defaults of the declared
/// kind, and enum defaults that parse back.
pub fn validate() -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for &pref in Pref::ALL {
        let key = pref.key();
        if key.is_empty() {
            anyhow::bail!("{pref:?} has an empty key");
        }
        if !seen.insert(key) {
            anyhow::bail!("preference key {key:?} is declared twice");
        }
        if let Some(default) = pref.default_value() {
            if default.kind() != pref.kind() {
                anyhow::bail!(
                    "{pref:?} is declared {} but defaults to a {} value",
                    pref.kind().as_str(),
                    default.kind().as_str()
                );
            }
            if let PrefValue::Str(raw) = &default
                && !pref.accepts(raw)
            {
                anyhow::bail!("{pref:?} default {raw:?} is not an accepted value");
            }
        }
    }
    Ok(())
}
