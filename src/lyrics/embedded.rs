//! Lyrics stored in the audio file's own tags.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::{Accessor, ItemKey, Tag};

use super::{TagError, TagSource};
use crate::models::Song;

/// Tag reader backed by `lofty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTags;

impl TagSource for LoftyTags {
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, TagError> {
        read_lyrics(path)
    }
}

fn ensure_file(path: &Path) -> Result<(), TagError> {
    if path.as_os_str().is_empty() {
        return Err(TagError::NoPath);
    }
    if !path.is_file() {
        return Err(TagError::Missing(path.to_path_buf()));
    }
    Ok(())
}

/// Lyrics from the primary tag, or from any other tag the file carries.
pub fn read_lyrics(path: &Path) -> Result<Option<String>, TagError> {
    ensure_file(path)?;
    let tagged = lofty::read_from_path(path)?;

    let lyrics = tagged
        .primary_tag()
        .into_iter()
        .chain(tagged.tags())
        .find_map(|tag| {
            tag.get_string(&ItemKey::Lyrics)
                .filter(|text| !text.trim().is_empty())
        })
        .map(str::to_string);
    Ok(lyrics)
}

/// Store `lyrics` in the file's primary tag, creating one if needed.
/// Blank text removes the lyrics item instead.
pub fn write_lyrics(path: &Path, lyrics: &str) -> Result<(), TagError> {
    ensure_file(path)?;
    let mut tagged_file = lofty::read_from_path(path)?;

    let mut tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        if let Some(tag) = tagged_file.first_tag() {
            tag_type = tag.tag_type();
        } else {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or(TagError::Unsupported(tag_type))?;

    if lyrics.trim().is_empty() {
        tag.remove_key(&ItemKey::Lyrics);
    } else if !tag.insert_text(ItemKey::Lyrics, lyrics.to_string()) {
        return Err(TagError::Unsupported(tag_type));
    }

    tagged_file.save_to_path(path, WriteOptions::default())?;
    tracing::debug!(path = %path.display(), "wrote lyrics tag");
    Ok(())
}

/// Descriptor for a file whose tags are unknown: titled after the file
/// name, with empty artist and album.
pub fn untagged_song(path: &Path) -> Song {
    Song {
        title: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string(),
        artist: String::new(),
        album: String::new(),
        path: path.to_string_lossy().into_owned(),
        ..Song::default()
    }
}

/// Track descriptor from the file's tags. Missing artist/album stay empty;
/// a missing title falls back to the file name.
pub fn read_song(path: &Path) -> Result<Song, TagError> {
    ensure_file(path)?;
    let tagged = lofty::read_from_path(path)?;

    let mut song = Song {
        duration: u32::try_from(tagged.properties().duration().as_millis()).unwrap_or(u32::MAX),
        ..untagged_song(path)
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        let text = |key: &ItemKey| {
            tag.get_string(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        if let Some(v) = text(&ItemKey::TrackTitle) {
            song.title = v;
        }
        if let Some(v) = text(&ItemKey::TrackArtist) {
            song.artist = v;
        }
        if let Some(v) = text(&ItemKey::AlbumTitle) {
            song.album = v;
        }
        song.track_number = tag.track().unwrap_or(0);
    }

    Ok(song)
}
