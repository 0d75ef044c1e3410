use crate::error::Result;
use crate::types::LegFilter;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default file looked up next to the binary when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "flight_stats.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Country of the reporting airport; legs whose other end is in this
    /// country are domestic.
    pub home_country: String,
    /// Operation type applied when the caller passes no filter of its own.
    pub operation_type: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            home_country: "BA".to_string(),
            operation_type: None,
        }
    }
}

impl EngineConfig {
    pub fn default_filter(&self) -> LegFilter {
        LegFilter {
            operation_type: self.operation_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { preview_rows: 5 }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Loads `path` when given, otherwise the default file if it exists,
    /// otherwise built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
