use crate::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub generator: GeneratorSettings,
    pub stream: StreamSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
    /// Scenery kind name → asset identifier
    pub sprites: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Segments kept when streaming with the scene cache (0 disables it)
    pub cache_segments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: ExportFormat,
    /// Write snapshots here instead of stdout
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 10_000.0,
            step: 100.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl SceneConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let stream = &self.stream;
        for (name, value) in [("start", stream.start), ("end", stream.end), ("step", stream.step)] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "stream.{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if stream.step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stream.step must be positive, got {}",
                stream.step
            )));
        }
        if stream.end < stream.start {
            return Err(ConfigError::Invalid(format!(
                "stream.end ({}) is before stream.start ({})",
                stream.end, stream.start
            )));
        }
        Ok(())
    }
}
