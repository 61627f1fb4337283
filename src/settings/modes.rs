//! Sort orders and theme choice as persisted enum strings.
//!
//! The stored strings are the media-library column expressions the player
//! passes to its queries, so they stay stable across releases.

use crate::models::{Album, Artist, Song};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongSortOrder {
    Default,
    AZ,
    ZA,
    Duration,
    Year,
    LastAdded,
    Album,
    Track,
}

impl SongSortOrder {
    pub const ALL: &'static [Self] = &[
        Self::Default,
        Self::AZ,
        Self::ZA,
        Self::Duration,
        Self::Year,
        Self::LastAdded,
        Self::Album,
        Self::Track,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "title_key",
            Self::AZ => "title",
            Self::ZA => "title DESC",
            Self::Duration => "duration DESC",
            Self::Year => "year",
            Self::LastAdded => "date_modified DESC",
            Self::Album => "album",
            Self::Track => "track, title_key",
        }
    }

    pub fn from_stored(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumSortOrder {
    Default,
    AZ,
    ZA,
    Year,
}

impl AlbumSortOrder {
    pub const ALL: &'static [Self] = &[Self::Default, Self::AZ, Self::ZA, Self::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "album_key",
            Self::AZ => "album",
            Self::ZA => "album DESC",
            Self::Year => "minyear DESC",
        }
    }

    pub fn from_stored(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistSortOrder {
    Default,
    AZ,
    ZA,
}

impl ArtistSortOrder {
    pub const ALL: &'static [Self] = &[Self::Default, Self::AZ, Self::ZA];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "artist_key",
            Self::AZ => "artist",
            Self::ZA => "artist DESC",
        }
    }

    pub fn from_stored(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Auto,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: &'static [Self] = &[Self::Auto, Self::Light, Self::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto_theme",
            Self::Light => "light_theme",
            Self::Dark => "dark_theme",
        }
    }

    pub fn from_stored(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == raw)
    }
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Sort songs in place. Orders backed by library-only columns (default,
/// year, last added) keep the incoming order.
pub fn sort_songs(songs: &mut [Song], order: SongSortOrder) {
    match order {
        SongSortOrder::AZ => songs.sort_by_cached_key(|s| fold(&s.title)),
        SongSortOrder::ZA => {
            songs.sort_by_cached_key(|s| std::cmp::Reverse(fold(&s.title)));
        }
        SongSortOrder::Duration => songs.sort_by_key(|s| std::cmp::Reverse(s.duration)),
        SongSortOrder::Album => {
            songs.sort_by_cached_key(|s| (fold(&s.album), s.track_number));
        }
        SongSortOrder::Track => {
            songs.sort_by_cached_key(|s| (s.track_number, fold(&s.title)));
        }
        SongSortOrder::Default | SongSortOrder::Year | SongSortOrder::LastAdded => {}
    }
}

/// Songs inside an album view always follow track numbers.
pub fn sort_album_songs(songs: &mut [Song]) {
    songs.sort_by_key(|s| s.track_number);
}

pub fn sort_albums(albums: &mut [Album], order: AlbumSortOrder) {
    match order {
        AlbumSortOrder::AZ => albums.sort_by_cached_key(|a| fold(&a.title)),
        AlbumSortOrder::ZA => albums.sort_by_cached_key(|a| std::cmp::Reverse(fold(&a.title))),
        AlbumSortOrder::Year => albums.sort_by_key(|a| std::cmp::Reverse(a.year)),
        AlbumSortOrder::Default => {}
    }
}

pub fn sort_artists(artists: &mut [Artist], order: ArtistSortOrder) {
    match order {
        ArtistSortOrder::AZ => artists.sort_by_cached_key(|a| fold(&a.name)),
        ArtistSortOrder::ZA => artists.sort_by_cached_key(|a| std::cmp::Reverse(fold(&a.name))),
        ArtistSortOrder::Default => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, album: &str, track: u32, duration: u32) -> Song {
        Song {
            title: title.to_string(),
            album: album.to_string(),
            track_number: track,
            duration,
            ..Song::default()
        }
    }

    fn titles(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn stored_strings_are_unique_and_parse_back() {
        for o in SongSortOrder::ALL {
            assert_eq!(SongSortOrder::from_stored(o.as_str()), Some(*o));
        }
        for o in AlbumSortOrder::ALL {
            assert_eq!(AlbumSortOrder::from_stored(o.as_str()), Some(*o));
        }
        for o in ArtistSortOrder::ALL {
            assert_eq!(ArtistSortOrder::from_stored(o.as_str()), Some(*o));
        }
        for t in Theme::ALL {
            assert_eq!(Theme::from_stored(t.as_str()), Some(*t));
        }
        assert_eq!(Theme::from_stored("neon"), None);
    }

    #[test]
    fn songs_sort_case_insensitively() {
        let mut songs = vec![
            song("beta", "x", 1, 10),
            song("Alpha", "x", 2, 30),
            song("gamma", "x", 3, 20),
        ];
        sort_songs(&mut songs, SongSortOrder::AZ);
        assert_eq!(titles(&songs), vec!["Alpha", "beta", "gamma"]);

        sort_songs(&mut songs, SongSortOrder::ZA);
        assert_eq!(titles(&songs), vec!["gamma", "beta", "Alpha"]);

        sort_songs(&mut songs, SongSortOrder::Duration);
        assert_eq!(titles(&songs), vec!["Alpha", "gamma", "beta"]);
    }

    #[test]
    fn library_orders_keep_input() {
        let mut songs = vec![song("b", "x", 1, 0), song("a", "x", 2, 0)];
        sort_songs(&mut songs, SongSortOrder::LastAdded);
        assert_eq!(titles(&songs), vec!["b", "a"]);
    }

    #[test]
    fn album_songs_follow_track_numbers() {
        let mut songs = vec![song("c", "x", 3, 0), song("a", "x", 1, 0), song("b", "x", 2, 0)];
        sort_album_songs(&mut songs);
        assert_eq!(titles(&songs), vec!["a", "b", "c"]);
    }

    #[test]
    fn albums_and_artists() {
        let mut albums = vec![
            Album { title: "b".into(), year: 1999, ..Album::default() },
            Album { title: "A".into(), year: 2005, ..Album::default() },
        ];
        sort_albums(&mut albums, AlbumSortOrder::AZ);
        assert_eq!(albums[0].title, "A");
        sort_albums(&mut albums, AlbumSortOrder::Year);
        assert_eq!(albums[0].year, 2005);

        let mut artists = vec![
            Artist { name: "abba".into(), ..Artist::default() },
            Artist { name: "Zappa".into(), ..Artist::default() },
        ];
        sort_artists(&mut artists, ArtistSortOrder::ZA);
        assert_eq!(artists[0].name, "Zappa");
    }
}
