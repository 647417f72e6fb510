use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::StoreError;

use super::Store;

/// One `<key>.json` file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers; strip anything that could escape `dir`.
        let safe: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl Store for FileStore {
    fn read_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn write_json(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        // Rename keeps the previous document intact if the write is interrupted.
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
