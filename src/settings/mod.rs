//! Typed access to the player's persisted preferences.
//!
//! Getters never fail: a missing key, a value of the wrong kind, an
//! unrecognised enum string or a backend error all fall back to the
//! documented default. Setters write through immediately and log backend
//! failures instead of returning them.

pub mod modes;
pub mod schema;

use anyhow::Context;

use crate::models::{QueueInfo, Song};
use crate::storage::{PrefKind, PrefValue, PreferenceStore};

pub use modes::{AlbumSortOrder, ArtistSortOrder, SongSortOrder, Theme};
pub use schema::Pref;

pub struct Settings<S> {
    store: S,
}

impl<S: PreferenceStore> Settings<S> {
    pub fn new(store: S) -> anyhow::Result<Self> {
        schema::validate().context("preference schema")?;
        Ok(Self { store })
    }

    /// The stored value for `pref` if it exists and has the declared kind.
    fn stored(&self, pref: Pref) -> Option<PrefValue> {
        match self.store.get(pref.key()) {
            Ok(Some(v)) if v.kind() == pref.kind() => Some(v),
            Ok(Some(v)) => {
                tracing::warn!(
                    key = pref.key(),
                    "stored {} value where {} was expected, using default",
                    v.kind().as_str(),
                    pref.kind().as_str()
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = pref.key(), "preference read failed: {e:#}");
                None
            }
        }
    }

    /// Effective value: stored if valid, otherwise the default. Enum strings
    /// the typed getters would reject count as invalid.
    pub fn get(&self, pref: Pref) -> Option<PrefValue> {
        match self.stored(pref) {
            Some(PrefValue::Str(raw)) if !pref.accepts(&raw) => {
                tracing::warn!(key = pref.key(), "unknown value {raw:?}, using default");
                pref.default_value()
            }
            Some(v) => Some(v),
            None => pref.default_value(),
        }
    }

    fn write(&self, pref: Pref, value: PrefValue) {
        debug_assert_eq!(value.kind(), pref.kind());
        if let Err(e) = self.store.put(pref.key(), &value) {
            tracing::warn!(key = pref.key(), "preference write failed: {e:#}");
        }
    }

    fn get_int(&self, pref: Pref, default: i32) -> i32 {
        match self.get(pref) {
            Some(PrefValue::Int(v)) => v,
            _ => default,
        }
    }

    fn get_bool(&self, pref: Pref, default: bool) -> bool {
        match self.get(pref) {
            Some(PrefValue::Bool(v)) => v,
            _ => default,
        }
    }

    fn get_str(&self, pref: Pref) -> Option<String> {
        match self.get(pref) {
            Some(PrefValue::Str(v)) => Some(v),
            _ => None,
        }
    }

    fn get_enum<T>(&self, pref: Pref, parse: fn(&str) -> Option<T>, default: T) -> T {
        match self.stored(pref) {
            Some(PrefValue::Str(raw)) => parse(&raw).unwrap_or_else(|| {
                tracing::warn!(key = pref.key(), "unknown value {raw:?}, using default");
                default
            }),
            _ => default,
        }
    }

    pub fn start_page_index(&self) -> i32 {
        self.get_int(Pref::StartPageIndex, 2)
    }

    pub fn set_start_page_index(&self, value: i32) {
        self.write(Pref::StartPageIndex, PrefValue::Int(value));
    }

    pub fn song_sort_order(&self) -> SongSortOrder {
        self.get_enum(Pref::SongSortOrder, SongSortOrder::from_stored, SongSortOrder::AZ)
    }

    pub fn set_song_sort_order(&self, value: SongSortOrder) {
        self.write(Pref::SongSortOrder, PrefValue::Str(value.as_str().into()));
    }

    pub fn album_sort_order(&self) -> AlbumSortOrder {
        self.get_enum(Pref::AlbumSortOrder, AlbumSortOrder::from_stored, AlbumSortOrder::AZ)
    }

    pub fn set_album_sort_order(&self, value: AlbumSortOrder) {
        self.write(Pref::AlbumSortOrder, PrefValue::Str(value.as_str().into()));
    }

    pub fn album_song_sort_order(&self) -> SongSortOrder {
        self.get_enum(
            Pref::AlbumSongSortOrder,
            SongSortOrder::from_stored,
            SongSortOrder::Track,
        )
    }

    pub fn set_album_song_sort_order(&self, value: SongSortOrder) {
        self.write(Pref::AlbumSongSortOrder, PrefValue::Str(value.as_str().into()));
    }

    pub fn artist_sort_order(&self) -> ArtistSortOrder {
        self.get_enum(Pref::ArtistSortOrder, ArtistSortOrder::from_stored, ArtistSortOrder::AZ)
    }

    pub fn set_artist_sort_order(&self, value: ArtistSortOrder) {
        self.write(Pref::ArtistSortOrder, PrefValue::Str(value.as_str().into()));
    }

    pub fn current_theme(&self) -> Theme {
        self.get_enum(Pref::CurrentTheme, Theme::from_stored, Theme::Auto)
    }

    pub fn set_current_theme(&self, value: Theme) {
        self.write(Pref::CurrentTheme, PrefValue::Str(value.as_str().into()));
    }

    /// JSON of the selected song; the default song when nothing was saved.
    pub fn current_song_selected(&self) -> String {
        self.get_str(Pref::CurrentSongSelected)
            .unwrap_or_else(schema::default_song_json)
    }

    pub fn set_current_song_selected(&self, json: &str) {
        self.write(Pref::CurrentSongSelected, PrefValue::Str(json.to_string()));
    }

    pub fn current_song(&self) -> Song {
        let raw = self.current_song_selected();
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("stored song is not valid JSON: {e}");
            Song::default()
        })
    }

    pub fn set_current_song(&self, song: &Song) {
        match serde_json::to_string(song) {
            Ok(json) => self.set_current_song_selected(&json),
            Err(e) => tracing::warn!("encode song {}: {e}", song.id),
        }
    }

    pub fn current_queue_info(&self) -> Option<String> {
        self.get_str(Pref::CurrentQueueInfo)
    }

    pub fn set_current_queue_info(&self, value: &str) {
        self.write(Pref::CurrentQueueInfo, PrefValue::Str(value.to_string()));
    }

    pub fn queue_info(&self) -> Option<QueueInfo> {
        let raw = self.current_queue_info()?;
        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!("stored queue info is not valid JSON: {e}"))
            .ok()
    }

    pub fn set_queue_info(&self, info: &QueueInfo) {
        match serde_json::to_string(info) {
            Ok(json) => self.set_current_queue_info(&json),
            Err(e) => tracing::warn!("encode queue info: {e}"),
        }
    }

    pub fn current_queue_list(&self) -> Option<String> {
        self.get_str(Pref::CurrentQueueList)
    }

    pub fn set_current_queue_list(&self, value: &str) {
        self.write(Pref::CurrentQueueList, PrefValue::Str(value.to_string()));
    }

    /// Song ids of the saved queue, empty when none was saved.
    pub fn queue_ids(&self) -> Vec<i64> {
        let Some(raw) = self.current_queue_list() else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("stored queue list is not valid JSON: {e}");
            Vec::new()
        })
    }

    pub fn set_queue_ids(&self, ids: &[i64]) {
        match serde_json::to_string(ids) {
            Ok(json) => self.set_current_queue_list(&json),
            Err(e) => tracing::warn!("encode queue list: {e}"),
        }
    }

    pub fn did_stop(&self) -> bool {
        self.get_bool(Pref::DidStop, false)
    }

    pub fn set_did_stop(&self, value: bool) {
        self.write(Pref::DidStop, PrefValue::Bool(value));
    }

    /// Parse `raw` for `pref` and store it. Unlike the typed setters this
    /// reports bad input and backend failures, since it serves user input.
    pub fn set_from_str(&self, pref: Pref, raw: &str) -> anyhow::Result<()> {
        let value = PrefValue::parse(pref.kind(), raw)?;
        if pref.kind() == PrefKind::Str && !pref.accepts(raw) {
            anyhow::bail!("{raw:?} is not a valid value for {}", pref.key());
        }
        self.store
            .put(pref.key(), &value)
            .with_context(|| format!("store {}", pref.key()))
    }

    /// Drop the stored value so the default applies again.
    pub fn reset(&self, pref: Pref) -> anyhow::Result<()> {
        self.store
            .remove(pref.key())
            .with_context(|| format!("reset {}", pref.key()))
    }

    /// Every preference with its effective value, in schema order.
    pub fn entries(&self) -> Vec<(Pref, Option<PrefValue>)> {
        Pref::ALL.iter().map(|&p| (p, self.get(p))).collect()
    }

    /// Stored keys that no preference claims, left behind by older builds
    /// or written by hand.
    pub fn unknown_keys(&self) -> anyhow::Result<Vec<String>> {
        let keys = self.store.keys().context("list stored preferences")?;
        Ok(keys
            .into_iter()
            .filter(|k| Pref::from_key(k).is_none())
            .collect())
    }
}
