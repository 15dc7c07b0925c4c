//! Hue configuration file handling

use anyhow::{Context, Result};
use hue_tokens::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "hue.toml";

/// Top-level Hue configuration (hue.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HueConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Where the color JSON files live
#[derive(Debug, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory holding color_palette.json, theme_color_mapping.json and
    /// semantic_color_mapping.json (relative to the working directory)
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("src/data")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

impl HueConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path` when given, else `./hue.toml` if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            tracing::debug!("using {}", default.display());
            return Self::load(default);
        }
        Ok(Self::default())
    }
}
