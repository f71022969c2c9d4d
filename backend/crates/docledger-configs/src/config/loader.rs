use super::types::{LedgerConfig, StorageBackendKind};
use std::fs;
use std::path::Path;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl LedgerConfig {
    /// Load configuration from a TOML file, apply environment overrides and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML text without env overrides or validation.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - DOCLEDGER_STORAGE_BACKEND: Override storage.backend ("memory" | "rocksdb")
    /// - DOCLEDGER_DATA_DIR: Override storage.data_path
    /// - DOCLEDGER_LOG_LEVEL: Override logging.level
    /// - DOCLEDGER_BCRYPT_COST: Override auth.bcrypt_cost
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        use std::env;

        if let Ok(backend) = env::var("DOCLEDGER_STORAGE_BACKEND") {
            self.storage.backend = StorageBackendKind::parse(&backend).ok_or_else(|| {
                anyhow::anyhow!("Invalid DOCLEDGER_STORAGE_BACKEND value: {}", backend)
            })?;
        }

        if let Ok(path) = env::var("DOCLEDGER_DATA_DIR") {
            self.storage.data_path = path;
        }

        if let Ok(level) = env::var("DOCLEDGER_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        if let Ok(cost) = env::var("DOCLEDGER_BCRYPT_COST") {
            self.auth.bcrypt_cost = cost
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid DOCLEDGER_BCRYPT_COST value: {}", cost))?;
        }

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_LOG_FORMATS.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LOG_LEVELS.join(", ")
                ));
            }
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "Invalid bcrypt cost {}. Must be between 4 and 31",
                self.auth.bcrypt_cost
            ));
        }

        if self.ids.max_attempts == 0 {
            return Err(anyhow::anyhow!("ids.max_attempts must be greater than 0"));
        }

        if self.storage.partition.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.partition cannot be empty"));
        }

        if self.storage.backend == StorageBackendKind::Rocksdb
            && self.storage.data_path.trim().is_empty()
        {
            return Err(anyhow::anyhow!(
                "storage.data_path is required for the rocksdb backend"
            ));
        }

        Ok(())
    }
}
