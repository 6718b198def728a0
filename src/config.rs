//! YAML configuration for the alignment engine.
//!
//! One file configures every tunable the engine exposes: normalization
//! minimums, strategy thresholds, merge geometry, and the orchestrator's
//! debounce and cache capacity. Sections are optional; a partial file
//! overrides only what it names.
//!
//! ```yaml
//! version: "1.0"
//! name: "contract-viewer"
//!
//! normalize:
//!   min_token_len: 2
//!   keyword_min_len: 3
//!
//! align:
//!   early_exit_confidence: 0.8
//!   merge_max_horizontal_gap: 24.0
//!
//! orchestrator:
//!   debounce_ms: 75
//!   cache_capacity: 64
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use align::{AlignConfig, AlignError};
use normalize::{NormalizeConfig, NormalizeError};

/// Errors raised while loading or validating engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Orchestrator-level tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Delay before a resolution starts, letting the rendering surface
    /// finish laying out runs.
    #[serde(default = "OrchestratorConfig::default_debounce_ms")]
    pub debounce_ms: u64,

    /// Alignment cache capacity in entries.
    #[serde(default = "OrchestratorConfig::default_cache_capacity")]
    pub cache_capacity: usize,

    /// Layout-scale discriminator for cache keys. Leave unset when runs are
    /// extracted in a scale-independent space, so zoom changes hit the
    /// cache.
    #[serde(default)]
    pub scale_key: Option<u32>,
}

impl OrchestratorConfig {
    fn default_debounce_ms() -> u64 {
        75
    }

    fn default_cache_capacity() -> usize {
        64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "orchestrator.cache_capacity must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::default_debounce_ms(),
            cache_capacity: Self::default_cache_capacity(),
            scale_key: None,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Configuration format version.
    #[serde(default = "EngineConfig::default_version")]
    pub version: String,

    /// Optional configuration name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub align: AlignConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

impl EngineConfig {
    fn default_version() -> String {
        "1.0".to_string()
    }

    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigError::UnsupportedVersion(v.to_string())),
        }
        self.normalize.validate()?;
        self.align.validate()?;
        self.orchestrator.validate()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            name: None,
            normalize: NormalizeConfig::default(),
            align: AlignConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}
