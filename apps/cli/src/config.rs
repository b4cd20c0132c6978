//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/chunkput/config.toml`
//! - Windows: `%APPDATA%/chunkput/config.toml`

use std::path::{Path, PathBuf};

use chunkput_upload::UploadConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// `Content-Type` sent with every chunk when `--content-type` is absent.
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Engine tunables.
    #[serde(default)]
    pub upload: UploadConfig,
}

fn default_content_type() -> String {
    "application/octet-stream".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_type: default_content_type(),
            upload: UploadConfig::default(),
        }
    }
}

impl Config {
    /// Loads from `path`, or the platform default, creating it if missing.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&config_path()),
        }
    }

    /// Loads configuration from `path`, or writes defaults there if not found.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Applies command-line overrides on top of file values.
    pub fn apply_overrides(
        &mut self,
        content_type: Option<String>,
        chunk_size: Option<usize>,
        timeout_secs: Option<u64>,
    ) {
        if let Some(content_type) = content_type {
            self.content_type = content_type;
        }
        if let Some(chunk_size) = chunk_size {
            self.upload.chunk_size = chunk_size;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.upload.request_timeout_secs = timeout_secs;
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("chunkput").join("config.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("chunkput")
            .join("config.toml")
    }
}
