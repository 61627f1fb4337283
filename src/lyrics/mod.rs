//! Lyrics lookup for a track
//!
//! This module provides:
//! - Embedded lyrics read from the audio file's tags
//! - LRCLIB API client as the online fallback
//! - Query composition for the fallback chain
//! - LRC helpers for displaying synced lyrics as plain text
//!
//! Resolution is best effort. Failures at either stage are logged and turn
//! into "no lyrics", never into an error for the caller.

pub mod embedded;
pub mod lrclib;
pub mod parser;
pub mod query;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::LyricsConfig;
use crate::models::Song;

pub use embedded::LoftyTags;
pub use lrclib::LrclibClient;
pub use query::FallbackPolicy;

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("track has no file path")]
    NoPath,
    #[error("no file at {0}")]
    Missing(PathBuf),
    #[error("tag type {0:?} cannot hold lyrics")]
    Unsupported(lofty::tag::TagType),
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("lyrics service timed out")]
    Timeout,
    #[error("lyrics service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("lyrics request failed: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else {
            LookupError::Http(e)
        }
    }
}

/// Reads the lyrics tag of a local file. Runs on a blocking thread.
pub trait TagSource: Send + Sync + 'static {
    fn read_lyrics(&self, path: &Path) -> Result<Option<String>, TagError>;
}

/// Online lyrics search by free-text query.
pub trait LyricsLookup: Send + Sync {
    fn lookup(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<String>, LookupError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsSource {
    Embedded,
    Online { query: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics {
    pub text: String,
    pub source: LyricsSource,
}

impl Lyrics {
    pub fn is_synced(&self) -> bool {
        parser::is_synced(&self.text)
    }

    pub fn plain_text(&self) -> String {
        parser::strip_timestamps(&self.text)
    }
}

pub struct LyricsResolver<T, L> {
    tags: Arc<T>,
    online: Option<L>,
    policy: FallbackPolicy,
}

impl LyricsResolver<LoftyTags, LrclibClient> {
    pub fn from_config(cfg: &LyricsConfig) -> anyhow::Result<Self> {
        let online = if cfg.online {
            Some(LrclibClient::from_config(cfg)?)
        } else {
            None
        };
        Ok(Self::new(LoftyTags, online, cfg.fallback))
    }
}

impl<T: TagSource, L: LyricsLookup> LyricsResolver<T, L> {
    pub fn new(tags: T, online: Option<L>, policy: FallbackPolicy) -> Self {
        Self {
            tags: Arc::new(tags),
            online,
            policy,
        }
    }

    /// Embedded tag first, then the online service.
    pub async fn resolve(&self, song: &Song) -> Option<Lyrics> {
        if let Some(text) = self.embedded(song).await {
            return Some(Lyrics {
                text,
                source: LyricsSource::Embedded,
            });
        }
        self.online(song).await
    }

    pub async fn embedded(&self, song: &Song) -> Option<String> {
        let tags = Arc::clone(&self.tags);
        let path = PathBuf::from(&song.path);
        let read = move || tags.read_lyrics(&path).map_err(|e| e.to_string());
        match tokio::task::spawn_blocking(read).await {
            Ok(Ok(Some(text))) if !text.trim().is_empty() => Some(text),
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                tracing::debug!(song = song.id, "no embedded lyrics: {e}");
                None
            }
            Err(e) => {
                tracing::warn!(song = song.id, "tag reader task failed: {e}");
                None
            }
        }
    }

    /// Walk the query list until one returns text. "Not found" moves on to
    /// the next query; an error ends the walk.
    pub async fn online(&self, song: &Song) -> Option<Lyrics> {
        let client = self.online.as_ref()?;
        for query in query::queries(song, self.policy) {
            match client.lookup(&query).await {
                Ok(Some(text)) if !text.trim().is_empty() => {
                    tracing::debug!(song = song.id, query = %query, "online lyrics found");
                    return Some(Lyrics {
                        text,
                        source: LyricsSource::Online { query },
                    });
                }
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(song = song.id, query = %query, "online lyrics lookup failed: {e}");
                    return None;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeTags(Result<Option<String>, ()>);

    impl TagSource for FakeTags {
        fn read_lyrics(&self, path: &Path) -> Result<Option<String>, TagError> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(()) => Err(TagError::Missing(path.to_path_buf())),
            }
        }
    }

    enum Reply {
        Text(&'static str),
        Fail,
    }

    #[derive(Default)]
    struct FakeLookup {
        replies: HashMap<&'static str, Reply>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn with(replies: Vec<(&'static str, Reply)>) -> Self {
            Self {
                replies: replies.into_iter().collect(),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LyricsLookup for &FakeLookup {
        async fn lookup(&self, query: &str) -> Result<Option<String>, LookupError> {
            self.calls.lock().unwrap().push(query.to_string());
            match self.replies.get(query) {
                Some(Reply::Text(t)) => Ok(Some(t.to_string())),
                Some(Reply::Fail) => Err(LookupError::Timeout),
                None => Ok(None),
            }
        }
    }

    fn song() -> Song {
        Song {
            id: 1,
            title: "T".into(),
            artist: "A;B".into(),
            album: "Al".into(),
            path: "/music/t.mp3".into(),
            ..Song::default()
        }
    }

    #[tokio::test]
    async fn embedded_lyrics_skip_the_network() {
        let lookup = FakeLookup::with(vec![("T - A,B Al", Reply::Text("online"))]);
        let resolver = LyricsResolver::new(
            FakeTags(Ok(Some("embedded".into()))),
            Some(&lookup),
            FallbackPolicy::Chain,
        );

        let lyrics = resolver.resolve(&song()).await.unwrap();
        assert_eq!(lyrics.text, "embedded");
        assert_eq!(lyrics.source, LyricsSource::Embedded);
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_or_unreadable_tag_falls_through() {
        for tags in [FakeTags(Ok(Some("  \n".into()))), FakeTags(Ok(None)), FakeTags(Err(()))] {
            let lookup = FakeLookup::with(vec![("T - A,B Al", Reply::Text("online"))]);
            let resolver = LyricsResolver::new(tags, Some(&lookup), FallbackPolicy::Chain);

            let lyrics = resolver.resolve(&song()).await.unwrap();
            assert_eq!(lyrics.text, "online");
            assert_eq!(
                lyrics.source,
                LyricsSource::Online {
                    query: "T - A,B Al".into()
                }
            );
        }
    }

    #[tokio::test]
    async fn chain_stops_at_first_hit() {
        let lookup = FakeLookup::with(vec![
            ("T - A,B", Reply::Text("third")),
            ("T - A", Reply::Text("fourth")),
        ]);
        let resolver = LyricsResolver::new(FakeTags(Ok(None)), Some(&lookup), FallbackPolicy::Chain);

        let lyrics = resolver.resolve(&song()).await.unwrap();
        assert_eq!(lyrics.text, "third");
        assert_eq!(lookup.calls(), vec!["T - A,B Al", "T - A Al", "T - A,B"]);
    }

    #[tokio::test]
    async fn exhausted_chain_is_absent() {
        let lookup = FakeLookup::default();
        let resolver = LyricsResolver::new(FakeTags(Ok(None)), Some(&lookup), FallbackPolicy::Chain);

        assert_eq!(resolver.resolve(&song()).await, None);
        assert_eq!(
            lookup.calls(),
            vec!["T - A,B Al", "T - A Al", "T - A,B", "T - A"]
        );
    }

    #[tokio::test]
    async fn single_policy_sends_one_query() {
        let lookup = FakeLookup::with(vec![("T - A", Reply::Text("never"))]);
        let resolver = LyricsResolver::new(FakeTags(Ok(None)), Some(&lookup), FallbackPolicy::Single);

        assert_eq!(resolver.resolve(&song()).await, None);
        assert_eq!(lookup.calls(), vec!["T - A,B Al"]);
    }

    #[tokio::test]
    async fn lookup_error_ends_the_chain() {
        let lookup = FakeLookup::with(vec![
            ("T - A Al", Reply::Fail),
            ("T - A,B", Reply::Text("unreached")),
        ]);
        let resolver = LyricsResolver::new(FakeTags(Ok(None)), Some(&lookup), FallbackPolicy::Chain);

        assert_eq!(resolver.resolve(&song()).await, None);
        assert_eq!(lookup.calls(), vec!["T - A,B Al", "T - A Al"]);
    }

    #[tokio::test]
    async fn blank_online_text_counts_as_not_found() {
        let lookup = FakeLookup::with(vec![
            ("T - A,B Al", Reply::Text(" ")),
            ("T - A Al", Reply::Text("found")),
        ]);
        let resolver = LyricsResolver::new(FakeTags(Ok(None)), Some(&lookup), FallbackPolicy::Chain);
        assert_eq!(resolver.resolve(&song()).await.unwrap().text, "found");
    }

    #[tokio::test]
    async fn offline_resolver_only_reads_tags() {
        let resolver: LyricsResolver<_, &FakeLookup> =
            LyricsResolver::new(FakeTags(Ok(None)), None, FallbackPolicy::Chain);
        assert_eq!(resolver.resolve(&song()).await, None);
    }

    #[tokio::test]
    async fn real_tag_reader_degrades_on_missing_file() {
        let lookup = FakeLookup::with(vec![("T - A,B Al", Reply::Text("online"))]);
        let resolver = LyricsResolver::new(LoftyTags, Some(&lookup), FallbackPolicy::Chain);
        assert_eq!(resolver.resolve(&song()).await.unwrap().text, "online");

        let untracked = Song {
            path: String::new(),
            ..song()
        };
        assert_eq!(resolver.embedded(&untracked).await, None);
    }

    #[test]
    fn lyrics_plain_text_strips_lrc() {
        let lyrics = Lyrics {
            text: "[00:01.00]one\n[00:02.00]two".into(),
            source: LyricsSource::Embedded,
        };
        assert!(lyrics.is_synced());
        assert_eq!(lyrics.plain_text(), "one\ntwo");
    }
}
