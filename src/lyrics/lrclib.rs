//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API that serves plain and synchronized (LRC)
//! lyrics. API Documentation: https://lrclib.net/docs

use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

use super::{LookupError, LyricsLookup};
use crate::config::LyricsConfig;

/// One entry of an LRCLIB search response
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LrclibResponse {
    pub id: i64,
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub instrumental: bool,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn from_config(cfg: &LyricsConfig) -> anyhow::Result<Self> {
        Self::new(
            &cfg.base_url,
            &cfg.user_agent,
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Free-text search. A 404 is an empty result, not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<LrclibResponse>, LookupError> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(query));

        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(Vec::new())
        } else {
            Err(LookupError::Status(response.status()))
        }
    }
}

/// First non-blank plain text, else first non-blank synced text.
pub fn pick_lyrics(results: &[LrclibResponse]) -> Option<String> {
    let usable = || results.iter().filter(|r| !r.instrumental);
    let non_blank = |s: &Option<String>| s.as_deref().filter(|t| !t.trim().is_empty()).map(str::to_string);

    usable()
        .find_map(|r| non_blank(&r.plain_lyrics))
        .or_else(|| usable().find_map(|r| non_blank(&r.synced_lyrics)))
}

impl LyricsLookup for LrclibClient {
    async fn lookup(&self, query: &str) -> Result<Option<String>, LookupError> {
        let results = self.search(query).await?;
        tracing::debug!(query, hits = results.len(), "lrclib search");
        Ok(pick_lyrics(&results))
    }
}
