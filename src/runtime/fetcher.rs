//! Catalog fetch worker.
//!
//! The session never blocks on the network: it queues `FetchRequest`s, the
//! worker thread runs them against the catalog one at a time and hands back
//! `FetchOutcome`s that the event loop feeds into the session.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::catalog::{Catalog, CatalogResult};
use crate::session::{FetchOutcome, FetchRequest};

pub struct Fetcher {
    requests: Sender<FetchRequest>,
    outcomes: Receiver<FetchOutcome>,
}

impl Fetcher {
    pub fn spawn(catalog: Arc<dyn Catalog>) -> io::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<FetchRequest>();
        let (out_tx, out_rx) = mpsc::channel::<FetchOutcome>();

        thread::Builder::new()
            .name("catalog-fetch".to_string())
            .spawn(move || {
                for request in req_rx {
                    let result = execute(catalog.as_ref(), &request);
                    if out_tx.send(FetchOutcome { request, result }).is_err() {
                        break;
                    }
                }
                log::debug!("catalog fetch worker stopped");
            })?;

        Ok(Self {
            requests: req_tx,
            outcomes: out_rx,
        })
    }

    pub fn submit(&self, request: FetchRequest) {
        if self.requests.send(request).is_err() {
            log::warn!("catalog fetch worker is gone; request dropped");
        }
    }

    /// Outcomes that finished since the last call, in completion order.
    pub fn drain(&self) -> Vec<FetchOutcome> {
        self.outcomes.try_iter().collect()
    }
}

fn execute(catalog: &dyn Catalog, request: &FetchRequest) -> CatalogResult {
    match request {
        FetchRequest::Chart { limit } => catalog.chart(*limit),
        FetchRequest::Search { query, .. } => catalog.search(query),
        FetchRequest::Recommendations { track_id, .. } => catalog.recommendations(track_id),
        FetchRequest::ArtistTop { artist_id, .. } => catalog.artist_top_tracks(artist_id),
    }
}
