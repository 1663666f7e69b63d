//! Store configuration.
//!
//! The data root is an explicit value handed to each component at
//! construction, so independent stores (e.g. one per test) can coexist.

use std::path::{Path, PathBuf};

/// Directory (under the data root) holding uploaded originals and mirrors.
pub const ORIGINALS_DIR: &str = "files";
/// Directory (under the data root) holding ledger JSON documents.
pub const LEDGER_DIR: &str = "processed";

const DATA_DIR_ENV: &str = "STOCKTALLY_DATA_DIR";
const TEMP_DIR_ENV: &str = "STOCKTALLY_TEMP_DIR";
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root holding `files/` and `processed/`.
    pub data_dir: PathBuf,
    /// Where uploads are staged while being parsed.
    pub temp_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// Build from `STOCKTALLY_DATA_DIR` / `STOCKTALLY_TEMP_DIR`.
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| {
            tracing::warn!("{DATA_DIR_ENV} not set; using {DEFAULT_DATA_DIR}");
            DEFAULT_DATA_DIR.to_string()
        });

        let config = Self::new(data_dir);
        match std::env::var(TEMP_DIR_ENV) {
            Ok(temp_dir) => config.with_temp_dir(temp_dir),
            Err(_) => config,
        }
    }

    pub fn originals_dir(&self) -> PathBuf {
        self.data_dir.join(ORIGINALS_DIR)
    }

    pub fn ledger_dir(&self) -> PathBuf {
        self.data_dir.join(LEDGER_DIR)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
