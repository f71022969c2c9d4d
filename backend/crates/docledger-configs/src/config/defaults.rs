// Default value functions

pub fn default_data_path() -> String {
    "./data".to_string()
}

pub fn default_partition() -> String {
    "world_state".to_string()
}

pub fn default_bcrypt_cost() -> u32 {
    12 // bcrypt::DEFAULT_COST
}

pub fn default_id_max_attempts() -> u32 {
    10
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

// RocksDB defaults (small footprint; a ledger node holds one column family)

pub fn default_rocksdb_write_buffer_size() -> usize {
    8 * 1024 * 1024 // 8MB
}

pub fn default_rocksdb_max_write_buffers() -> i32 {
    2
}

pub fn default_rocksdb_block_cache_size() -> usize {
    16 * 1024 * 1024 // 16MB
}

pub fn default_rocksdb_max_background_jobs() -> i32 {
    2
}

pub fn default_rocksdb_max_open_files() -> i32 {
    512
}
