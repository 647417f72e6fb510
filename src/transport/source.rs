//! Opening audio sources by URL.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::TransportError;

/// Upper bound on a downloaded source. Catalog previews are well below this.
pub(super) const MAX_SOURCE_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Remote(String),
    Local(PathBuf),
}

impl SourceKind {
    pub fn of(url: &str) -> Self {
        let url = url.trim();
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Remote(url.to_string())
        } else if let Some(path) = url.strip_prefix("file://") {
            Self::Local(PathBuf::from(path))
        } else {
            Self::Local(PathBuf::from(url))
        }
    }
}

fn source_error(url: &str, reason: impl ToString) -> TransportError {
    TransportError::Source {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// Download a remote source into memory, refusing anything over
/// `MAX_SOURCE_BYTES`.
pub(super) fn download(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, TransportError> {
    let response = agent.get(url).call().map_err(|e| source_error(url, e))?;
    read_capped(response.into_reader(), MAX_SOURCE_BYTES, url)
}

/// Read `reader` to the end. More than `limit` bytes is an error, not a
/// truncated source.
pub(super) fn read_capped(
    reader: impl Read,
    limit: u64,
    url: &str,
) -> Result<Vec<u8>, TransportError> {
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| source_error(url, e))?;
    if bytes.len() as u64 > limit {
        return Err(source_error(url, format!("source exceeds {limit} bytes")));
    }
    Ok(bytes)
}

/// Open a local file for streaming decode.
pub(super) fn open_local(path: &Path, url: &str) -> Result<BufReader<File>, TransportError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| source_error(url, e))
}
