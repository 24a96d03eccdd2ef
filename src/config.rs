// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::DEFAULT_CAPACITY;

pub const ENV_CONFIG_PATH: &str = "READINESS_CONFIG_PATH";
pub const ENV_DATA_PATH: &str = "READINESS_DATA_PATH";
pub const ENV_OUTPUT_DIR: &str = "READINESS_OUTPUT_DIR";
pub const ENV_INTERVAL_MS: &str = "READINESS_INTERVAL_MS";

pub const DEFAULT_CONFIG_PATH: &str = "config/readiness.toml";
pub const DEFAULT_INTERVAL_MS: u64 = 600_000;

fn default_data_path() -> PathBuf {
    PathBuf::from("data/dataset.json")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}
fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}
fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Monitor mode: delay between passes.
    #[serde(default = "default_interval_ms")]
    pub monitor_interval_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Where monitor mode persists history between restarts.
    #[serde(default)]
    pub history_path: Option<PathBuf>,
    /// Optional weight overrides (TOML or JSON).
    #[serde(default)]
    pub weights_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            output_dir: default_output_dir(),
            monitor_interval_ms: default_interval_ms(),
            history_capacity: default_history_capacity(),
            history_path: None,
            weights_path: None,
        }
    }
}

impl EngineConfig {
    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, &ext)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolve config using env var + fallbacks:
    /// 1) $READINESS_CONFIG_PATH (must exist)
    /// 2) config/readiness.toml
    /// 3) built-in defaults
    ///
    /// Env overrides (`READINESS_DATA_PATH`, ...) are applied on top.
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if p.exists() {
                Self::load_from(&p)?
            } else {
                Self::default()
            }
        };
        Ok(base.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(p) = std::env::var(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(p);
        }
        if let Some(ms) = std::env::var(ENV_INTERVAL_MS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.monitor_interval_ms = ms;
        }
        self.sanitized()
    }

    /// Replace nonsense values with defaults.
    pub fn sanitized(mut self) -> Self {
        if self.monitor_interval_ms == 0 {
            self.monitor_interval_ms = DEFAULT_INTERVAL_MS;
        }
        if self.history_capacity == 0 {
            self.history_capacity = DEFAULT_CAPACITY;
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<EngineConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("invalid JSON config");
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        // extension-less files may still be JSON
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!(toml_err))
            .context("invalid TOML config"),
    }
}
