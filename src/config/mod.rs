use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::lyrics::FallbackPolicy;

pub mod defaults;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub lyrics: LyricsConfig,
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Query the online lyrics service when a file carries no lyrics tag.
    pub online: bool,
    /// "chain" walks progressively less specific queries, "single" sends one.
    pub fallback: FallbackPolicy,
    pub base_url: String,
    /// Per-request timeout for the online service.
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Namespace all preference keys live under.
    pub namespace: String,
}

impl PathsConfig {
    pub fn preferences_db(&self) -> PathBuf {
        self.data_dir.join("preferences.sqlite3")
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "encore", "encore").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = defaults::defaults();
        write_config(&cfg, &path).context("write default config")?;
        tracing::info!("wrote default config to {}", path.display());
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert!(cfg.lyrics.online);
        assert_eq!(cfg.lyrics.fallback, FallbackPolicy::Chain);
        assert_eq!(cfg.preferences.namespace, "configs");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[lyrics]\nonline = false\nfallback = \"single\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let cfg = load(Some(&path)).unwrap();
        assert!(!cfg.lyrics.online);
        assert_eq!(cfg.lyrics.fallback, FallbackPolicy::Single);
        assert_eq!(cfg.lyrics.timeout_secs, 3);
        assert_eq!(cfg.lyrics.base_url, defaults::LRCLIB_BASE_URL);
        assert_eq!(cfg.preferences.namespace, "configs");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = defaults::defaults();
        cfg.preferences.namespace = "alt".to_string();
        cfg.paths.data_dir = dir.path().join("data");
        save(&cfg, Some(&path)).unwrap();

        let loaded = load(Some(&path)).unwrap();
        assert_eq!(loaded.preferences.namespace, "alt");
        assert_eq!(loaded.paths.preferences_db(), dir.path().join("data").join("preferences.sqlite3"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[lyrics\nonline = ").unwrap();
        assert!(load(Some(&path)).is_err());
    }
}
