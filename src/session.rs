//! The playback session controller.
//!
//! A `Session` owns the transport, the play queue, recently-played history and
//! playlists. It is a plain value driven from one event loop: commands come
//! in as method calls, transport happenings as `TransportEvent`s, and catalog
//! work goes out as `FetchRequest`s whose results are applied back with
//! `apply_outcome`.

mod controller;
mod fallback;
mod playlists;
mod state;

pub use controller::{RESTART_THRESHOLD_SECS, Session};
pub use state::*;

#[cfg(test)]
mod tests;
