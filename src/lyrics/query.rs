//! Search strings sent to the online lyrics service.

use serde::{Deserialize, Serialize};

use crate::models::Song;

/// How many queries to try before giving up on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Full query, then drop the extra artists, then the album, then both.
    #[default]
    Chain,
    /// Full query only.
    Single,
}

/// `"A;B"` becomes `"A,B"`.
pub fn normalize_artist(artist: &str) -> String {
    artist.replace(';', ",")
}

/// The first non-blank artist of a `;`/`,` separated list.
pub fn first_artist(artist: &str) -> &str {
    artist
        .split([';', ','])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

/// `"<title> - <artist> <album>"`, leaving out blank parts.
pub fn compose(title: &str, artist: &str, album: Option<&str>) -> String {
    let mut q = title.trim().to_string();
    let artist = artist.trim();
    if !artist.is_empty() {
        if !q.is_empty() {
            q.push_str(" - ");
        }
        q.push_str(artist);
    }
    if let Some(album) = album.map(str::trim).filter(|a| !a.is_empty()) {
        q.push(' ');
        q.push_str(album);
    }
    q
}

/// Queries for `song` in the order they should be tried. Variants that
/// collapse to an earlier one (single artist, no album) appear once.
pub fn queries(song: &Song, policy: FallbackPolicy) -> Vec<String> {
    let all = normalize_artist(&song.artist);
    let first = first_artist(&song.artist);
    let album = Some(song.album.as_str());

    let candidates = match policy {
        FallbackPolicy::Single => vec![compose(&song.title, &all, album)],
        FallbackPolicy::Chain => vec![
            compose(&song.title, &all, album),
            compose(&song.title, first, album),
            compose(&song.title, &all, None),
            compose(&song.title, first, None),
        ],
    };

    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for q in candidates {
        if !q.is_empty() && !out.contains(&q) {
            out.push(q);
        }
    }
    out
}
