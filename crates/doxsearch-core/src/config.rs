//! Configuration for doxsearch.
//!
//! Read from a TOML file; every field has a default so an empty or absent
//! file is valid.

use crate::error::{IndexError, Result};
use crate::shard::Section;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "DOXSEARCH_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "doxsearch.toml";

fn default_search_dir() -> PathBuf {
    PathBuf::from("search")
}

fn default_limit() -> usize {
    50
}

fn default_strict() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the generated shard files
    #[serde(default = "default_search_dir")]
    pub search_dir: PathBuf,
    /// Only load these sections (empty = all)
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Section filter applied to queries that don't name one
    #[serde(default)]
    pub default_section: Option<Section>,
    /// Maximum matches per query (0 = unlimited)
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Abort loading on the first malformed shard
    #[serde(default = "default_strict")]
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_dir: default_search_dir(),
            sections: Vec::new(),
            default_section: None,
            limit: default_limit(),
            strict: default_strict(),
        }
    }
}

impl Config {
    /// Parse a config file. Relative `search_dir` values are resolved
    /// against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
        let mut config: Config = toml::from_str(&content).map_err(|e| IndexError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.search_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            config.search_dir = parent.join(&config.search_dir);
        }
        Ok(config)
    }

    /// Load config with optional path override.
    ///
    /// Precedence:
    /// 1. `path_override` parameter (from --config CLI flag)
    /// 2. `DOXSEARCH_CONFIG` environment variable
    /// 3. `./doxsearch.toml` if present
    /// 4. built-in defaults
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        if let Some(path) = path_override {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    /// Query limit as an option (`0` means unlimited).
    pub fn effective_limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }
}
