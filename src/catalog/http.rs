use std::time::Duration;

use serde_json::Value;

use crate::error::CatalogError;
use crate::library::Track;

use super::wire::{parse_track, parse_track_list};
use super::{Catalog, CatalogResult, FetchPolicy};

/// Catalog client for a Deezer-shaped public API, backed by `ureq`.
pub struct HttpCatalog {
    agent: ureq::Agent,
    base_url: String,
    policy: FetchPolicy,
    page_limit: usize,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration, policy: FetchPolicy) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(concat!("encore/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            policy,
            page_limit: 25,
        }
    }

    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, CatalogError> {
        let url = self.url(path, params);
        log::debug!("catalog GET {url}");
        let response = self.agent.get(&url).call().map_err(|err| match err {
            ureq::Error::Status(code, _) => CatalogError::Status(code),
            ureq::Error::Transport(t) => CatalogError::Network(t.to_string()),
        })?;
        response
            .into_json::<Value>()
            .map_err(|e| CatalogError::Malformed(e.to_string()))
    }

    fn get_tracks(&self, label: &str, path: &str, params: &[(&str, String)]) -> CatalogResult {
        self.policy
            .run(label, || self.get_json(path, params).and_then(parse_track_list))
    }

    fn get_track(&self, id: &str) -> Result<Track, CatalogError> {
        let path = format!("track/{}", urlencoding::encode(id));
        // Single-object lookups reuse the list policy by wrapping in a vec.
        self.policy
            .run("track", || {
                self.get_json(&path, &[])
                    .and_then(parse_track)
                    .map(|t| vec![t])
            })?
            .into_iter()
            .next()
            .ok_or(CatalogError::Empty)
    }
}

impl Catalog for HttpCatalog {
    fn search(&self, query: &str) -> CatalogResult {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::Empty);
        }
        self.get_tracks(
            "search",
            "search",
            &[("q", query.to_string()), ("limit", self.page_limit.to_string())],
        )
    }

    fn chart(&self, limit: usize) -> CatalogResult {
        self.get_tracks("chart", "chart/0/tracks", &[("limit", limit.max(1).to_string())])
    }

    fn recommendations(&self, track_id: &str) -> CatalogResult {
        let seed = self.get_track(track_id)?;
        let artist_id = seed
            .artist_id
            .clone()
            .ok_or_else(|| CatalogError::Malformed("seed track has no artist".to_string()))?;

        let related: Vec<Track> = self
            .artist_top_tracks(&artist_id)?
            .into_iter()
            .filter(|t| t.id != seed.id)
            .collect();
        if related.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(related)
    }

    fn artist_top_tracks(&self, artist_id: &str) -> CatalogResult {
        let path = format!("artist/{}/top", urlencoding::encode(artist_id));
        self.get_tracks("artist top", &path, &[("limit", self.page_limit.to_string())])
    }
}

#[cfg(test)]
impl HttpCatalog {
    pub(super) fn url_for_test(&self, path: &str, params: &[(&str, String)]) -> String {
        self.url(path, params)
    }
}
