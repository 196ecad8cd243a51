use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use faso_lod::Layer;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default = "default_layers")]
    pub layers: Vec<Layer>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    /// Directory holding `<layer>.geojson` source files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Spread per-feature work across threads
    #[serde(default)]
    pub parallel: bool,
    /// Write canonical source data instead of annotated output
    #[serde(default)]
    pub canonical: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            parallel: false,
            canonical: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            layers: default_layers(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("public/geojson")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_layers() -> Vec<Layer> {
    Layer::all().to_vec()
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
