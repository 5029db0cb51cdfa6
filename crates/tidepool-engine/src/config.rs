//! Typed configuration for the purchase engine.
//!
//! Embedders usually run with [`EngineConfig::default`]; deployments that
//! tune the engine load a YAML file whose structure mirrors these
//! structs. All fields have defaults matching the engine's contract (one
//! bounded retry after a lost execution race).

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Execution-phase settings.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Solver settings.
    #[serde(default)]
    pub solver: SolverConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Execution-phase configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutionConfig {
    /// How many times a lost execution race is retried with a fresh
    /// snapshot before the purchase is given up.
    #[serde(default = "default_race_retries")]
    pub race_retries: u32,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            race_retries: default_race_retries(),
        }
    }
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SolverConfig {
    /// Alternative-group count above which the orchestrator logs a
    /// warning. Solve time is exponential in the group count; this is
    /// advisory only and never limits the solver.
    #[serde(default = "default_group_warn_threshold")]
    pub group_warn_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            group_warn_threshold: default_group_warn_threshold(),
        }
    }
}

const fn default_race_retries() -> u32 {
    1
}

const fn default_group_warn_threshold() -> usize {
    8
}
