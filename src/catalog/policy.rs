use std::thread;
use std::time::Duration;

use crate::error::CatalogError;

use super::CatalogResult;

/// Retry policy applied to every catalog request.
///
/// An empty result counts as a failure so callers see one error type for
/// "nothing usable came back".
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            backoff: Duration::from_millis(300),
        }
    }
}

impl FetchPolicy {
    pub fn run<F>(&self, label: &str, mut op: F) -> CatalogResult
    where
        F: FnMut() -> CatalogResult,
    {
        let attempts = self.retries.saturating_add(1);
        let mut last = CatalogError::Empty;

        for attempt in 1..=attempts {
            match op() {
                Ok(tracks) if !tracks.is_empty() => return Ok(tracks),
                Ok(_) => last = CatalogError::Empty,
                Err(e) => last = e,
            }

            if !is_retryable(&last) || attempt == attempts {
                break;
            }
            log::debug!("catalog {label}: attempt {attempt}/{attempts} failed: {last}");
            thread::sleep(self.backoff * attempt);
        }

        Err(last)
    }
}

/// Network hiccups, throttling and server errors are worth another try.
fn is_retryable(err: &CatalogError) -> bool {
    match err {
        CatalogError::Network(_) => true,
        CatalogError::Status(code) => *code == 429 || *code >= 500,
        _ => false,
    }
}
