use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/pdd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PddConfig {
    /// Default number of concurrent fetch workers when `-p` is not given.
    pub workers: usize,
    /// Binary the remote client invokes (e.g. "hdfs").
    pub hdfs_bin: String,
    /// Optional parent directory for merge-mode scratch areas
    /// (platform temp location if missing).
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for PddConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            hdfs_bin: "hdfs".to_string(),
            scratch_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pdd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PddConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PddConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PddConfig = toml::from_str(&data)?;
    Ok(cfg)
}
