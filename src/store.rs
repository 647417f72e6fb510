//! String-keyed JSON persistence.
//!
//! The session writes whole collections (`playlists`, `recentlyPlayed`) under
//! fixed keys; reads happen once at startup.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::StoreError;

pub const PLAYLISTS_KEY: &str = "playlists";
pub const RECENTLY_PLAYED_KEY: &str = "recentlyPlayed";

/// Synchronous key-value storage for JSON documents.
pub trait Store {
    /// Read the document stored under `key`, `None` when nothing was stored.
    fn read_json(&self, key: &str) -> Result<Option<Value>, StoreError>;
    /// Replace the document stored under `key`.
    fn write_json(&mut self, key: &str, value: &Value) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests;
