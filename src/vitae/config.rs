//! # Configuration
//!
//! Vitae configuration is loaded with [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `VITAE_DATA_FILE`, `VITAE_SAVE_ATTEMPTS`, ...
//! 2. **Config file**: `vitae.toml` in the OS config directory (via `directories`).
//! 3. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_file` | `<data dir>/resume_data.json` | The JSON document |
//! | `save_attempts` | `8` | Rename attempts while the target is busy |
//! | `save_delay_ms` | `120` | Delay between rename attempts |
//! | `load_attempts` | `6` | Read attempts on I/O errors |
//! | `load_delay_ms` | `80` | Delay between read attempts |
//! | `backoff` | `fixed` | `fixed` or `exponential` (doubling, capped at 8× the delay) |
//!
//! The CLI's `--file` flag overrides `data_file`.

use crate::error::{Result, VitaeError};
use crate::store::retry::{Backoff, RetryPolicy, StorePolicy};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "vitae.toml";
pub const DATA_FILENAME: &str = "resume_data.json";
const EXPONENTIAL_CAP: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackoffKind {
    Fixed,
    Exponential,
}

impl TryFrom<String> for BackoffKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(BackoffKind::Fixed),
            "exponential" => Ok(BackoffKind::Exponential),
            other => Err(format!(
                "unknown backoff '{}', expected 'fixed' or 'exponential'",
                other
            )),
        }
    }
}

impl From<BackoffKind> for String {
    fn from(kind: BackoffKind) -> Self {
        match kind {
            BackoffKind::Fixed => "fixed".to_string(),
            BackoffKind::Exponential => "exponential".to_string(),
        }
    }
}

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct VitaeConfig {
    /// Path of the JSON document.
    #[config(env = "VITAE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    #[config(env = "VITAE_SAVE_ATTEMPTS", default = 8)]
    pub save_attempts: u32,

    #[config(env = "VITAE_SAVE_DELAY_MS", default = 120)]
    pub save_delay_ms: u64,

    #[config(env = "VITAE_LOAD_ATTEMPTS", default = 6)]
    pub load_attempts: u32,

    #[config(env = "VITAE_LOAD_DELAY_MS", default = 80)]
    pub load_delay_ms: u64,

    #[config(env = "VITAE_BACKOFF", default = "fixed")]
    pub backoff: BackoffKind,
}

impl Default for VitaeConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            save_attempts: 8,
            save_delay_ms: 120,
            load_attempts: 6,
            load_delay_ms: 80,
            backoff: BackoffKind::Fixed,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "vitae", "vitae")
}

impl VitaeConfig {
    /// Load from the environment, then `config_file` if given and present.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = config_file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| VitaeError::Config(e.to_string()))
    }

    pub fn default_config_file() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// The configured document path, else the OS data directory, else the working
    /// directory.
    pub fn data_file(&self) -> PathBuf {
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATA_FILENAME))
            .unwrap_or_else(|| PathBuf::from(DATA_FILENAME))
    }

    pub fn store_policy(&self) -> StorePolicy {
        StorePolicy {
            save: self.retry(self.save_attempts, self.save_delay_ms),
            load: self.retry(self.load_attempts, self.load_delay_ms),
        }
    }

    fn retry(&self, attempts: u32, delay_ms: u64) -> RetryPolicy {
        let delay = Duration::from_millis(delay_ms);
        let backoff = match self.backoff {
            BackoffKind::Fixed => Backoff::Fixed(delay),
            BackoffKind::Exponential => Backoff::Exponential {
                initial: delay,
                max: delay.saturating_mul(EXPONENTIAL_CAP),
            },
        };
        RetryPolicy { attempts, backoff }
    }
}
