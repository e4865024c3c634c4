use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var overriding `api_base_url` (used by tests and local backends).
pub const API_BASE_ENV: &str = "MUSIC_PLAYLIST_API_BASE";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Upper bound for a single backend round trip.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_api_base_url() -> String { "https://music-playlist-backend-production.up.railway.app/".into() }
fn default_request_timeout_ms() -> u64 { 10_000 }
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("music-playlist")
        .join("logs")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// Explicit path wins; otherwise the per-user config file if it exists,
    /// otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = explicit {
            return Self::from_path(p);
        }
        match Self::user_config_path() {
            Some(p) if p.exists() => Self::from_path(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("music-playlist").join("config.toml"))
    }

    pub fn api_base(&self) -> String {
        std::env::var(API_BASE_ENV).unwrap_or_else(|_| self.api_base_url.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
