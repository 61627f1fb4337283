use directories::ProjectDirs;

use super::{Config, LyricsConfig, PathsConfig, PreferencesConfig};
use crate::lyrics::FallbackPolicy;

pub const LRCLIB_BASE_URL: &str = "https://lrclib.net/api";
pub const USER_AGENT: &str = concat!("encore/", env!("CARGO_PKG_VERSION"));
pub const PREFERENCES_NAMESPACE: &str = "configs";

pub fn defaults() -> Config {
    Config::default()
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "encore", "encore");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("encore"));
        Self { data_dir }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            online: true,
            fallback: FallbackPolicy::Chain,
            base_url: LRCLIB_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            namespace: PREFERENCES_NAMESPACE.to_string(),
        }
    }
}
