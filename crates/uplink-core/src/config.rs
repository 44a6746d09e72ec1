use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::filter::ExistencePolicy;

/// Origin used when no base URL has been configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Global configuration loaded from `~/.config/uplink/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkConfig {
    /// Origin prepended to every rewritten upload link (e.g. `https://git.example.com`).
    pub base_url: String,
    /// What to do when an upload cannot be confirmed to exist.
    #[serde(default)]
    pub existence_policy: ExistencePolicy,
    /// Directory holding stored uploads, laid out by owner path. When unset,
    /// existence checks are skipped and every upload is assumed present.
    #[serde(default)]
    pub upload_root: Option<PathBuf>,
    /// Upper bound for a single existence check in milliseconds (None = unbounded).
    #[serde(default)]
    pub oracle_timeout_ms: Option<u64>,
}

impl Default for UplinkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            existence_policy: ExistencePolicy::default(),
            upload_root: None,
            oracle_timeout_ms: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("uplink")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UplinkConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<UplinkConfig> {
    if !path.exists() {
        let default_cfg = UplinkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: UplinkConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
