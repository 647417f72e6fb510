//! Applying catalog results, with the sample-data fallback for every read.
//!
//! A failed or empty catalog read never reaches the user as an error: the
//! session substitutes local data and raises an informational notice.

use crate::catalog::CatalogResult;
use crate::library::{Track, sample_tracks, search_samples};
use crate::transport::Transport;

use super::controller::Session;
use super::state::{FetchOutcome, FetchRequest, Notice};

impl<T: Transport> Session<T> {
    /// Queue a chart request to (re)populate the catalog.
    pub fn request_chart(&mut self, limit: usize) {
        self.request(FetchRequest::Chart { limit });
    }

    /// Start a search. Results of earlier searches still in flight will be
    /// discarded when they arrive.
    pub fn begin_search(&mut self, query: &str) -> u64 {
        self.search_seq += 1;
        let seq = self.search_seq;
        self.request(FetchRequest::Search {
            seq,
            query: query.trim().to_string(),
        });
        seq
    }

    /// Browse an artist's top tracks into the search results view.
    pub fn browse_artist(&mut self, artist_id: &str) -> u64 {
        self.search_seq += 1;
        let seq = self.search_seq;
        self.request(FetchRequest::ArtistTop {
            seq,
            artist_id: artist_id.to_string(),
        });
        seq
    }

    pub fn clear_search(&mut self) {
        self.search_seq += 1;
        self.search_results.clear();
    }

    /// Route a finished fetch to its handler. Returns false when the result
    /// was stale and dropped.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        match outcome.request {
            FetchRequest::Chart { .. } => {
                self.apply_chart(outcome.result);
                true
            }
            FetchRequest::Search { seq, query } => self.apply_search(seq, &query, outcome.result),
            FetchRequest::Recommendations { token, .. } => {
                self.apply_recommendations(token, outcome.result)
            }
            FetchRequest::ArtistTop { seq, artist_id } => {
                self.apply_artist_top(seq, &artist_id, outcome.result)
            }
        }
    }

    pub fn apply_chart(&mut self, result: CatalogResult) {
        self.catalog = self.resolve("chart", result, |_| sample_tracks());
    }

    pub fn apply_search(&mut self, seq: u64, query: &str, result: CatalogResult) -> bool {
        if seq != self.search_seq {
            log::debug!("session: dropping stale search #{seq} for '{query}'");
            return false;
        }
        self.search_results = self.resolve("search", result, |_| search_samples(query));
        true
    }

    pub fn apply_artist_top(&mut self, seq: u64, artist_id: &str, result: CatalogResult) -> bool {
        if seq != self.search_seq {
            log::debug!("session: dropping stale artist lookup #{seq}");
            return false;
        }
        self.search_results = self.resolve("artist", result, |_| {
            sample_tracks()
                .into_iter()
                .filter(|t| t.artist_id.as_deref() == Some(artist_id))
                .collect()
        });
        true
    }

    /// Replace the queue with recommendations for the track that was current
    /// when `token` was issued. Falls back to the rest of the catalog.
    pub fn apply_recommendations(&mut self, token: u64, result: CatalogResult) -> bool {
        if token != self.token {
            log::debug!(
                "session: dropping stale recommendations (token {token}, now {})",
                self.token
            );
            return false;
        }
        let Some(current_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            return false;
        };

        let usable = |tracks: Vec<Track>| -> Vec<Track> {
            tracks
                .into_iter()
                .filter(|t| t.id != current_id && t.is_playable())
                .collect()
        };

        let result = result.map(usable);
        let queue = self.resolve("recommendations", result, |s| {
            s.catalog
                .iter()
                .filter(|t| t.id != current_id && t.is_playable())
                .cloned()
                .collect()
        });
        log::info!("session: queue replaced with {} track(s)", queue.len());
        self.queue = queue.into();
        true
    }

    /// Successful non-empty results pass through; anything else is replaced
    /// by `fallback` and announced.
    fn resolve<F>(&mut self, label: &str, result: CatalogResult, fallback: F) -> Vec<Track>
    where
        F: FnOnce(&Self) -> Vec<Track>,
    {
        match result {
            Ok(tracks) if !tracks.is_empty() => tracks,
            other => {
                let reason = match other {
                    Err(e) => e.to_string(),
                    Ok(_) => "no results".to_string(),
                };
                log::info!("session: {label} unavailable ({reason}), using local data");
                self.notify(Notice::info(format!(
                    "Catalog unavailable ({reason}); showing local {label} results"
                )));
                fallback(&*self)
            }
        }
    }
}
