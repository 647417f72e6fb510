//! Audio transport: the single playable element the session drives.
//!
//! The session owns exactly one `Transport`; nothing else may start, pause or
//! seek it. Asynchronous happenings (load completion, progress, end of media,
//! errors) are polled from the event loop as `TransportEvent`s.

mod rodio_transport;
mod source;

pub use rodio_transport::RodioTransport;

use crate::error::TransportError;

/// Outcome of `Transport::load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The source is in place; `play` may follow immediately.
    Ready,
    /// The source is being fetched. A `Ready` or `LoadFailed` event carrying
    /// the same token follows.
    Pending,
}

/// Events reported by the transport between commands.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A pending load finished; the source sits paused.
    Ready { token: u64 },
    /// A pending load could not be fetched or decoded.
    LoadFailed { token: u64, reason: String },
    /// Playback position in seconds.
    Progress(f64),
    /// Total length of the loaded source in seconds.
    DurationKnown(f64),
    /// Playback paused by something other than the session.
    Paused,
    /// End of media reached.
    Ended,
    /// A seek was refused; playback continues where it was.
    SeekFailed(String),
    /// Playback failed after it had started.
    Error(String),
}

pub trait Transport {
    /// Replace the current source with `url`. The new source starts paused.
    /// `token` tags the `Ready`/`LoadFailed` event of a pending load.
    fn load(&mut self, url: &str, token: u64) -> Result<LoadStatus, TransportError>;
    /// Start or resume playback of the loaded source.
    fn play(&mut self) -> Result<(), TransportError>;
    fn pause(&mut self);
    /// Drop the loaded source and forget any pending load.
    fn stop(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);
    /// Drain events accumulated since the previous call.
    fn poll_events(&mut self) -> Vec<TransportEvent>;
}

#[cfg(test)]
mod tests;
