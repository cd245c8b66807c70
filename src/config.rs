//! Configuration management with validation and defaults
//!
//! TOML file, environment variable overrides and a builder. Every section
//! validates itself; the loader refuses to hand out an invalid configuration.

use crate::errors::{ConfigurationError, FairResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const ENV_HOUSE_EDGE: &str = "FAIRPLAY_HOUSE_EDGE";
pub const ENV_CRASH_MAX: &str = "FAIRPLAY_CRASH_MAX";
pub const ENV_ROTATION_BUDGET: &str = "FAIRPLAY_ROTATION_BUDGET";
pub const ENV_LOG_LEVEL: &str = "FAIRPLAY_LOG_LEVEL";

/// Complete fairplay configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FairplayConfig {
    pub engine: EngineConfig,
    pub seeds: SeedConfig,
    pub logging: LoggingConfig,
}

impl Default for FairplayConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            seeds: SeedConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// House rules applied by the fairness engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// House edge in percent (1.0 = 1%)
    pub house_edge_percent: f64,
    /// Ceiling applied to crash points
    pub crash_max_multiplier: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            house_edge_percent: 1.0,
            crash_max_multiplier: 100.0,
        }
    }
}

impl EngineConfig {
    /// Payout fraction kept by the player, e.g. 0.99 for a 1% edge.
    pub fn edge_factor(&self) -> f64 {
        (100.0 - self.house_edge_percent) / 100.0
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..10.0).contains(&self.house_edge_percent) {
            return Err(ConfigurationError::InvalidValue {
                field: "engine.house_edge_percent".to_string(),
                value: self.house_edge_percent.to_string(),
                reason: "House edge must be within [0, 10) percent".to_string(),
            });
        }

        if !self.crash_max_multiplier.is_finite() || self.crash_max_multiplier < 1.01 {
            return Err(ConfigurationError::InvalidValue {
                field: "engine.crash_max_multiplier".to_string(),
                value: self.crash_max_multiplier.to_string(),
                reason: "Crash ceiling must be at least 1.01".to_string(),
            });
        }

        Ok(())
    }
}

/// Seed generation and rotation policy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SeedConfig {
    /// Rounds a seed pair may serve before it must rotate
    pub rotation_round_budget: u64,
    /// Random bytes behind each server seed
    pub server_seed_bytes: usize,
    /// Random bytes behind each generated client seed
    pub client_seed_bytes: usize,
    /// Longest client seed a player may supply
    pub max_client_seed_len: usize,
    /// Revealed seed pairs kept per session
    pub revealed_history_limit: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            rotation_round_budget: 100,
            server_seed_bytes: 32, // 256 bits
            client_seed_bytes: 16, // 128 bits
            max_client_seed_len: 64,
            revealed_history_limit: 50,
        }
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.rotation_round_budget == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "seeds.rotation_round_budget".to_string(),
                value: "0".to_string(),
                reason: "Round budget cannot be zero".to_string(),
            });
        }

        if self.server_seed_bytes < 32 {
            return Err(ConfigurationError::InvalidValue {
                field: "seeds.server_seed_bytes".to_string(),
                value: self.server_seed_bytes.to_string(),
                reason: "Server seeds need at least 256 bits of entropy".to_string(),
            });
        }

        if self.client_seed_bytes < 16 {
            return Err(ConfigurationError::InvalidValue {
                field: "seeds.client_seed_bytes".to_string(),
                value: self.client_seed_bytes.to_string(),
                reason: "Client seeds need at least 128 bits of entropy".to_string(),
            });
        }

        if self.max_client_seed_len == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "seeds.max_client_seed_len".to_string(),
                value: "0".to_string(),
                reason: "Client seeds must be allowed at least one character".to_string(),
            });
        }

        if self.revealed_history_limit == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "seeds.revealed_history_limit".to_string(),
                value: "0".to_string(),
                reason: "At least one revealed seed pair must be kept".to_string(),
            });
        }

        Ok(())
    }
}

/// Logging defaults used when RUST_LOG is not set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive for the fairplay targets.
    pub fn filter_directive(&self) -> String {
        format!("fairplay={}", self.level)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(ConfigurationError::InvalidValue {
                field: "logging.level".to_string(),
                value: other.to_string(),
                reason: "Expected one of trace, debug, info, warn, error, off".to_string(),
            }),
        }
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> FairResult<FairplayConfig> {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => FairplayConfig::default(),
        };

        self.apply_overrides(&mut config, |key| env::var(key).ok())?;
        self.validate(&config)?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> FairResult<FairplayConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e))
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    fn apply_overrides<F>(&self, config: &mut FairplayConfig, lookup: F) -> FairResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(edge) = lookup(ENV_HOUSE_EDGE) {
            config.engine.house_edge_percent =
                edge.parse().map_err(|_| ConfigurationError::InvalidValue {
                    field: ENV_HOUSE_EDGE.to_string(),
                    value: edge,
                    reason: "Invalid percentage".to_string(),
                })?;
        }

        if let Some(max) = lookup(ENV_CRASH_MAX) {
            config.engine.crash_max_multiplier =
                max.parse().map_err(|_| ConfigurationError::InvalidValue {
                    field: ENV_CRASH_MAX.to_string(),
                    value: max,
                    reason: "Invalid multiplier".to_string(),
                })?;
        }

        if let Some(budget) = lookup(ENV_ROTATION_BUDGET) {
            config.seeds.rotation_round_budget =
                budget.parse().map_err(|_| ConfigurationError::InvalidValue {
                    field: ENV_ROTATION_BUDGET.to_string(),
                    value: budget,
                    reason: "Invalid round count".to_string(),
                })?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level.to_lowercase();
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self, config: &FairplayConfig) -> FairResult<()> {
        config.engine.validate()?;
        config.seeds.validate()?;
        config.logging.validate()?;
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, config: &FairplayConfig, path: &str) -> FairResult<()> {
        let toml_string = toml::to_string_pretty(config).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, toml_string).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into()
        })
    }
}

/// Builder pattern for creating configurations
pub struct ConfigBuilder {
    config: FairplayConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FairplayConfig::default(),
        }
    }

    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn seeds(mut self, seeds: SeedConfig) -> Self {
        self.config.seeds = seeds;
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    pub fn house_edge_percent(mut self, edge: f64) -> Self {
        self.config.engine.house_edge_percent = edge;
        self
    }

    pub fn rotation_round_budget(mut self, rounds: u64) -> Self {
        self.config.seeds.rotation_round_budget = rounds;
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> FairResult<FairplayConfig> {
        ConfigLoader::new().validate(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config(path: &str) -> FairResult<()> {
    let config = FairplayConfig::default();
    ConfigLoader::new().save(&config, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = FairplayConfig::default();
        assert_eq!(config.engine.house_edge_percent, 1.0);
        assert_eq!(config.engine.crash_max_multiplier, 100.0);
        assert_eq!(config.seeds.rotation_round_budget, 100);
        assert_eq!(config.seeds.server_seed_bytes, 32);
        assert!((config.engine.edge_factor() - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_config_validation() {
        let loader = ConfigLoader::new();
        let mut config = FairplayConfig::default();
        assert!(loader.validate(&config).is_ok());

        config.seeds.rotation_round_budget = 0;
        assert!(loader.validate(&config).is_err());

        config = FairplayConfig::default();
        config.engine.house_edge_percent = 12.5;
        assert!(loader.validate(&config).is_err());

        config = FairplayConfig::default();
        config.seeds.server_seed_bytes = 16;
        assert!(loader.validate(&config).is_err());

        config = FairplayConfig::default();
        config.seeds.revealed_history_limit = 0;
        assert!(loader.validate(&config).is_err());

        config = FairplayConfig::default();
        config.logging.level = "loud".to_string();
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_HOUSE_EDGE, "2.5"),
            (ENV_ROTATION_BUDGET, "250"),
            (ENV_LOG_LEVEL, "DEBUG"),
        ]
        .into_iter()
        .collect();

        let mut config = FairplayConfig::default();
        ConfigLoader::new()
            .apply_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.engine.house_edge_percent, 2.5);
        assert_eq!(config.seeds.rotation_round_budget, 250);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let mut config = FairplayConfig::default();
        let result = ConfigLoader::new().apply_overrides(&mut config, |key| {
            (key == ENV_CRASH_MAX).then(|| "lots".to_string())
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .house_edge_percent(2.0)
            .rotation_round_budget(10)
            .build()
            .unwrap();

        assert_eq!(config.engine.house_edge_percent, 2.0);
        assert_eq!(config.seeds.rotation_round_budget, 10);

        assert!(ConfigBuilder::new().rotation_round_budget(0).build().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FairplayConfig =
            toml::from_str("[engine]\nhouse_edge_percent = 3.0\n").unwrap();
        assert_eq!(config.engine.house_edge_percent, 3.0);
        assert_eq!(config.engine.crash_max_multiplier, 100.0);
        assert_eq!(config.seeds, SeedConfig::default());
    }

    #[test]
    fn test_save_and_load_config() -> FairResult<()> {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let original_config = FairplayConfig::default();
        let loader = ConfigLoader::new();
        loader.save(&original_config, path)?;

        let loaded = loader.load_from_file(path)?;
        assert_eq!(loaded, original_config);

        Ok(())
    }
}
