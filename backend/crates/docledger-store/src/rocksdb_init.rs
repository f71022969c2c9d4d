//! RocksDB initialization utilities for DocLedger.
//!
//! Opens (or creates) a database with the world-state column family present.

use anyhow::Result;
use docledger_configs::RocksDbSettings;
use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use std::sync::Arc;

/// RocksDB initializer for creating/opening the world-state database.
pub struct RocksDbInit {
    db_path: String,
    partition: String,
    settings: RocksDbSettings,
}

impl RocksDbInit {
    /// Create a new initializer for the given path with custom settings.
    pub fn new(
        db_path: impl Into<String>,
        partition: impl Into<String>,
        settings: RocksDbSettings,
    ) -> Self {
        Self {
            db_path: db_path.into(),
            partition: partition.into(),
            settings,
        }
    }

    /// Create a new initializer with default settings.
    pub fn with_defaults(db_path: impl Into<String>, partition: impl Into<String>) -> Self {
        Self::new(db_path, partition, RocksDbSettings::default())
    }

    /// Open or create the RocksDB database and ensure the world-state CF exists.
    pub fn open(&self) -> Result<Arc<DB>> {
        let path = Path::new(&self.db_path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        db_opts.set_write_buffer_size(self.settings.write_buffer_size);
        db_opts.set_max_write_buffer_number(self.settings.max_write_buffers);
        db_opts.set_max_background_jobs(self.settings.max_background_jobs);
        db_opts.increase_parallelism(self.settings.max_background_jobs);
        db_opts.set_max_open_files(self.settings.max_open_files);

        // Shared by every column family
        let cache = Cache::new_lru_cache(self.settings.block_cache_size);
        db_opts.set_block_based_table_factory(&create_block_options_with_cache(&cache));

        // Keep whatever CFs are already on disk, then add the world state
        let mut existing = match DB::list_cf(&db_opts, path) {
            Ok(cfs) if !cfs.is_empty() => cfs,
            _ => vec!["default".to_string()],
        };
        if !existing.iter().any(|n| n == &self.partition) {
            existing.push(self.partition.clone());
        }

        let cf_descriptors: Vec<_> = existing
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                apply_cf_settings(&mut cf_opts, &self.settings);
                cf_opts.set_block_based_table_factory(&create_block_options_with_cache(&cache));
                ColumnFamilyDescriptor::new(name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;
        log::debug!(
            "Opened RocksDB at {} with column families {:?}",
            self.db_path,
            existing
        );

        Ok(Arc::new(db))
    }
}

fn apply_cf_settings(cf_opts: &mut Options, settings: &RocksDbSettings) {
    cf_opts.set_write_buffer_size(settings.write_buffer_size);
    cf_opts.set_max_write_buffer_number(settings.max_write_buffers);
    // No optimize_for_point_lookup(): its hash memtable breaks ordered prefix scans.
}

fn create_block_options_with_cache(cache: &Cache) -> BlockBasedOptions {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    // Bloom filter speeds up the existence checks on the create path
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);
    block_opts.set_pin_l0_filter_and_index_blocks_in_cache(true);
    block_opts.set_whole_key_filtering(true);
    block_opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_partition() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db");

        let db = RocksDbInit::with_defaults(path.to_string_lossy(), "world_state")
            .open()
            .unwrap();
        assert!(db.cf_handle("world_state").is_some());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db").to_string_lossy().to_string();

        {
            let db = RocksDbInit::with_defaults(path.clone(), "world_state")
                .open()
                .unwrap();
            let cf = db.cf_handle("world_state").unwrap();
            db.put_cf(cf, b"k", b"v").unwrap();
        }

        let db = RocksDbInit::with_defaults(path, "world_state").open().unwrap();
        let cf = db.cf_handle("world_state").unwrap();
        assert_eq!(db.get_cf(cf, b"k").unwrap(), Some(b"v".to_vec()));
    }
}
