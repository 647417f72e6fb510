//! Remote music catalog access.
//!
//! `Catalog` is the seam the session and fetch worker talk to. `HttpCatalog`
//! implements it against a Deezer-shaped JSON API; `OfflineCatalog` refuses
//! every request so the session falls back to the built-in samples.
//!
//! Every request goes through one `FetchPolicy` (retry with linear backoff).
//! Turning failures into fallback data is the session's job, not the client's.

mod http;
mod policy;
mod wire;

pub use http::HttpCatalog;
pub use policy::FetchPolicy;

use crate::error::CatalogError;
use crate::library::Track;

pub type CatalogResult = Result<Vec<Track>, CatalogError>;

/// Read-only catalog queries. All fallible, none fatal.
pub trait Catalog: Send + Sync {
    fn search(&self, query: &str) -> CatalogResult;
    fn chart(&self, limit: usize) -> CatalogResult;
    /// Tracks related to `track_id`, never including the seed itself.
    fn recommendations(&self, track_id: &str) -> CatalogResult;
    fn artist_top_tracks(&self, artist_id: &str) -> CatalogResult;
}

/// Catalog used when the remote API is disabled in settings.
pub struct OfflineCatalog;

impl Catalog for OfflineCatalog {
    fn search(&self, _query: &str) -> CatalogResult {
        Err(CatalogError::Disabled)
    }

    fn chart(&self, _limit: usize) -> CatalogResult {
        Err(CatalogError::Disabled)
    }

    fn recommendations(&self, _track_id: &str) -> CatalogResult {
        Err(CatalogError::Disabled)
    }

    fn artist_top_tracks(&self, _artist_id: &str) -> CatalogResult {
        Err(CatalogError::Disabled)
    }
}

#[cfg(test)]
mod tests;
