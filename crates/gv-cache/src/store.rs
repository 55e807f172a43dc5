//! Serialized feature-table store.
//!
//! Tables are serde-encoded to one file per key inside the store directory.
//! Presence of a key short-circuits source loading entirely; invalidation is
//! manual (delete the file).  Staleness against the source tiles is never
//! checked.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use gv_core::FeatureTable;

use crate::error::CacheResult;

/// A directory of cached feature tables.
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Absolute path a key maps to.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    /// Read the table stored under `key`, or `None` when absent.
    pub fn load(&self, key: &str) -> CacheResult<Option<FeatureTable>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        let table = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(table))
    }

    /// Write `table` under `key`, creating the store directory as needed and
    /// overwriting any previous entry.
    pub fn save(&self, key: &str, table: &FeatureTable) -> CacheResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let file = File::create(self.path_for(key))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, table)?;
        writer.flush()?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
