use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level DocLedger configuration (`docledger.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub ids: IdSettings,
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which key-value store backs the world state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    /// Process-local ordered map (tests, embedded use)
    #[default]
    Memory,
    /// RocksDB under `data_path/rocksdb`
    Rocksdb,
}

impl StorageBackendKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Some(StorageBackendKind::Memory),
            "rocksdb" => Some(StorageBackendKind::Rocksdb),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackendKind,
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Column family holding the world state
    #[serde(default = "default_partition")]
    pub partition: String,
    #[serde(default)]
    pub rocksdb: RocksDbSettings,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            data_path: default_data_path(),
            partition: default_partition(),
            rocksdb: RocksDbSettings::default(),
        }
    }
}

impl StorageSettings {
    /// Get RocksDB directory path (data_path/rocksdb)
    pub fn rocksdb_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_path).join("rocksdb")
    }
}

/// RocksDB-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbSettings {
    /// Write buffer size in bytes (default: 8MB)
    #[serde(default = "default_rocksdb_write_buffer_size")]
    pub write_buffer_size: usize,

    /// Maximum number of write buffers (default: 2)
    #[serde(default = "default_rocksdb_max_write_buffers")]
    pub max_write_buffers: i32,

    /// Block cache size for reads in bytes (default: 16MB)
    #[serde(default = "default_rocksdb_block_cache_size")]
    pub block_cache_size: usize,

    /// Maximum number of background jobs (default: 2)
    #[serde(default = "default_rocksdb_max_background_jobs")]
    pub max_background_jobs: i32,

    /// Maximum number of open files (default: 512, -1 for unlimited)
    #[serde(default = "default_rocksdb_max_open_files")]
    pub max_open_files: i32,
}

impl Default for RocksDbSettings {
    fn default() -> Self {
        Self {
            write_buffer_size: default_rocksdb_write_buffer_size(),
            max_write_buffers: default_rocksdb_max_write_buffers(),
            block_cache_size: default_rocksdb_block_cache_size(),
            max_background_jobs: default_rocksdb_max_background_jobs(),
            max_open_files: default_rocksdb_max_open_files(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// bcrypt cost used when hashing new credentials (4..=31)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdSettings {
    /// Attempts before user-id generation gives up
    #[serde(default = "default_id_max_attempts")]
    pub max_attempts: u32,
}

impl Default for IdSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_id_max_attempts(),
        }
    }
}

/// Entity registry layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryVersion {
    /// Single-segment primary keys, no secondary indexes
    V1,
    /// Composite primary keys with secondary indexes
    #[default]
    V2,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySettings {
    #[serde(default)]
    pub version: RegistryVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Per-target level overrides, e.g. `docledger_store = "debug"`
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}
