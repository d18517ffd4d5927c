//! Configuration Management
//!
//! Loads user configuration for awsrc from the config directory.

use crate::resource::RefreshFlags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the cache file location
pub const CACHE_FILE_ENV: &str = "AWSRC_CACHE_FILE";

/// Cache file name inside the data directory
pub const CACHE_FILE_NAME: &str = "RESOURCES.txt";

fn default_true() -> bool {
    true
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cache file location
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
    /// Program used to reach AWS (defaults to `aws`)
    #[serde(default)]
    pub aws_program: Option<String>,
    /// Named AWS profile
    #[serde(default)]
    pub profile: Option<String>,
    /// AWS region
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_true")]
    pub refresh_instance_ids: bool,
    #[serde(default = "default_true")]
    pub refresh_instance_tags: bool,
    #[serde(default = "default_true")]
    pub refresh_bucket_names: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_file: None,
            aws_program: None,
            profile: None,
            region: None,
            refresh_instance_ids: true,
            refresh_instance_tags: true,
            refresh_bucket_names: true,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("awsrc").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse configuration, falling back to defaults on invalid JSON
    pub fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|e| {
            tracing::warn!("Invalid config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Refresh flags from config
    pub fn refresh_flags(&self) -> RefreshFlags {
        RefreshFlags {
            instance_ids: self.refresh_instance_ids,
            instance_tags: self.refresh_instance_tags,
            bucket_names: self.refresh_bucket_names,
        }
    }

    /// Get effective cache file (CLI > env > config > data dir)
    pub fn effective_cache_file(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| {
            std::env::var_os(CACHE_FILE_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| self.cache_file.clone())
        .unwrap_or_else(default_cache_file)
    }

    /// Get effective AWS program
    pub fn effective_program(&self) -> String {
        self.aws_program
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "aws".to_string())
    }
}

/// Default cache file under the user data directory
pub fn default_cache_file() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("awsrc").join(CACHE_FILE_NAME);
    }
    PathBuf::from("data").join(CACHE_FILE_NAME)
}
