//! Track, artist and playlist records plus the built-in sample catalog.
//!
//! Records are validated at the catalog boundary before they get here, so
//! everything in this module can assume well-formed ids and titles.

mod model;
mod sample;

pub use model::*;
pub use sample::{sample_tracks, search_samples};
