use std::collections::VecDeque;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{SessionError, StoreError, TransportError};
use crate::library::{Playlist, Track, sample_tracks};
use crate::store::{PLAYLISTS_KEY, RECENTLY_PLAYED_KEY, Store};
use crate::transport::{LoadStatus, Transport, TransportEvent};

use super::state::{FetchRequest, Notice, PlaybackState, RecentlyPlayed};

/// `previous()` restarts the current track instead of stepping back once
/// playback is past this point.
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

pub struct Session<T: Transport> {
    pub(super) transport: T,
    store: Box<dyn Store>,

    /// Full song catalog in browse order; `next`/`previous` walk it when the
    /// queue is empty.
    pub(super) catalog: Vec<Track>,
    pub(super) search_results: Vec<Track>,

    pub(super) current: Option<Track>,
    pub(super) state: PlaybackState,
    volume: f32,
    progress: f64,
    duration: Option<f64>,

    pub(super) queue: VecDeque<Track>,
    pub(super) recently_played: RecentlyPlayed,
    pub(super) playlists: Vec<Playlist>,

    /// Bumped on every track change; recommendation results carry the value
    /// current when they were requested.
    pub(super) token: u64,
    pub(super) search_seq: u64,
    /// Autoplay intent for a load the transport is still preparing.
    pending_load: Option<bool>,

    requests: Vec<FetchRequest>,
    notices: VecDeque<Notice>,
}

impl<T: Transport> Session<T> {
    /// Create a session, restoring playlists and history from `store`.
    ///
    /// The catalog starts as the built-in sample set until a chart result is
    /// applied.
    pub fn new(transport: T, store: Box<dyn Store>) -> Self {
        let playlists: Vec<Playlist> = restore::<Vec<Playlist>>(store.as_ref(), PLAYLISTS_KEY)
            .unwrap_or_default()
            .into_iter()
            .map(dedupe_playlist)
            .collect();
        let recently_played = RecentlyPlayed::from_tracks(
            restore::<Vec<Track>>(store.as_ref(), RECENTLY_PLAYED_KEY).unwrap_or_default(),
        );

        log::info!(
            "session: restored {} playlist(s), {} recently played",
            playlists.len(),
            recently_played.len()
        );

        Self {
            transport,
            store,
            catalog: sample_tracks(),
            search_results: Vec::new(),
            current: None,
            state: PlaybackState::Idle,
            volume: 1.0,
            progress: 0.0,
            duration: None,
            queue: VecDeque::new(),
            recently_played,
            playlists,
            token: 0,
            search_seq: 0,
            pending_load: None,
            requests: Vec::new(),
            notices: VecDeque::new(),
        }
    }

    // ----- accessors -------------------------------------------------------

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Duration reported by the transport, else the catalog metadata.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn queue(&self) -> &VecDeque<Track> {
        &self.queue
    }

    pub fn recently_played(&self) -> &[Track] {
        self.recently_played.as_slice()
    }

    pub fn catalog(&self) -> &[Track] {
        &self.catalog
    }

    pub fn search_results(&self) -> &[Track] {
        &self.search_results
    }

    #[cfg(test)]
    pub fn token(&self) -> u64 {
        self.token
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Drain catalog requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Drain user-facing notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub(super) fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub(super) fn request(&mut self, req: FetchRequest) {
        self.requests.push(req);
    }

    /// Look a track up by id in everything the session currently knows about.
    pub fn find_track(&self, track_id: &str) -> Option<Track> {
        self.current
            .iter()
            .chain(self.queue.iter())
            .chain(self.catalog.iter())
            .chain(self.search_results.iter())
            .chain(self.recently_played.as_slice().iter())
            .chain(self.playlists.iter().flat_map(|p| p.tracks.iter()))
            .find(|t| t.id == track_id)
            .cloned()
    }

    fn catalog_position(&self, track_id: &str) -> Option<usize> {
        self.catalog.iter().position(|t| t.id == track_id)
    }

    // ----- transport control ----------------------------------------------

    /// Play `track`, or resume it when it is the paused current track.
    ///
    /// With an empty queue, a recommendations fetch tagged with the new play
    /// token is scheduled once playback has started.
    pub fn play(&mut self, track: Track) -> Result<(), SessionError> {
        if !track.is_playable() {
            return Err(SessionError::InvalidTrack(track.id));
        }

        if self.current.as_ref() == Some(&track) {
            match self.state {
                PlaybackState::Playing | PlaybackState::Loading => return Ok(()),
                PlaybackState::Paused => return self.resume(),
                PlaybackState::Idle | PlaybackState::Ended => {}
            }
        }

        let track_id = track.id.clone();
        self.start(track, true)?;

        if self.queue.is_empty() {
            let token = self.token;
            self.request(FetchRequest::Recommendations { token, track_id });
        }
        Ok(())
    }

    /// Play the track with `track_id` if the session knows it.
    pub fn play_by_id(&mut self, track_id: &str) -> Result<(), SessionError> {
        let track = self
            .find_track(track_id)
            .ok_or_else(|| SessionError::NotFound(format!("track {track_id}")))?;
        self.play(track)
    }

    fn resume(&mut self) -> Result<(), SessionError> {
        if self.current.is_none() {
            return Ok(());
        }
        if self.pending_load.is_some() {
            self.pending_load = Some(true);
            self.state = PlaybackState::Loading;
            return Ok(());
        }
        self.begin_playback()
    }

    fn begin_playback(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.transport.play() {
            return Err(self.reject(e));
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Make `track` current. Loads it into the transport and starts playback
    /// when `autoplay` is set, otherwise leaves it paused.
    ///
    /// A source the transport prepares in the background keeps the session
    /// in `Loading` until the matching `Ready` or `LoadFailed` event.
    fn start(&mut self, track: Track, autoplay: bool) -> Result<(), SessionError> {
        self.token += 1;
        self.pending_load = None;
        self.state = PlaybackState::Loading;
        self.progress = 0.0;
        self.duration = (track.duration_seconds > 0).then_some(track.duration_seconds as f64);
        self.current = Some(track.clone());
        self.remember_played(track.clone());

        log::info!("session: loading '{}' (token {})", track.display(), self.token);
        match self.transport.load(&track.audio_source_url, self.token) {
            Err(e) => Err(self.reject(e)),
            Ok(LoadStatus::Pending) => {
                self.pending_load = Some(autoplay);
                if !autoplay {
                    self.state = PlaybackState::Paused;
                }
                Ok(())
            }
            Ok(LoadStatus::Ready) if autoplay => self.begin_playback(),
            Ok(LoadStatus::Ready) => {
                self.state = PlaybackState::Paused;
                Ok(())
            }
        }
    }

    /// Fall back to idle after the transport refused a source.
    fn reject(&mut self, e: TransportError) -> SessionError {
        log::warn!("session: playback rejected: {e}");
        self.go_idle();
        SessionError::PlaybackRejected(e.to_string())
    }

    fn go_idle(&mut self) {
        self.transport.stop();
        self.pending_load = None;
        self.current = None;
        self.state = PlaybackState::Idle;
        self.progress = 0.0;
        self.duration = None;
    }

    pub fn pause(&mut self) {
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Loading) {
            self.transport.pause();
            self.state = PlaybackState::Paused;
            if self.pending_load.is_some() {
                self.pending_load = Some(false);
            }
        }
    }

    /// Space-bar semantics: pause, resume, or start the catalog from the top.
    pub fn toggle_playback(&mut self) -> Result<(), SessionError> {
        match self.state {
            PlaybackState::Playing | PlaybackState::Loading => {
                self.pause();
                Ok(())
            }
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle | PlaybackState::Ended => {
                let first = self.current.clone().or_else(|| {
                    self.catalog.iter().find(|t| t.is_playable()).cloned()
                });
                match first {
                    Some(t) => self.play(t),
                    None => Ok(()),
                }
            }
        }
    }

    /// Advance to the queue head, else to the following catalog entry.
    /// Past the end of the catalog the session goes idle.
    pub fn next(&mut self) -> Result<(), SessionError> {
        let resume = matches!(
            self.state,
            PlaybackState::Playing | PlaybackState::Loading | PlaybackState::Ended
        );

        while let Some(track) = self.queue.pop_front() {
            if track.is_playable() {
                return self.start(track, resume);
            }
            log::debug!("session: skipping unplayable queued track {}", track.id);
        }

        let Some(current_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            return Ok(());
        };

        let following = self
            .catalog_position(&current_id)
            .and_then(|i| self.catalog[i + 1..].iter().find(|t| t.is_playable()))
            .cloned();

        match following {
            Some(track) => self.start(track, resume),
            None => {
                log::info!("session: reached end of catalog");
                self.go_idle();
                Ok(())
            }
        }
    }

    /// Restart the current track when past `RESTART_THRESHOLD_SECS`,
    /// otherwise step back one catalog entry.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        if self.current.is_some() && self.progress > RESTART_THRESHOLD_SECS {
            self.transport.seek(0.0);
            self.progress = 0.0;
            return Ok(());
        }

        let resume = matches!(
            self.state,
            PlaybackState::Playing | PlaybackState::Loading | PlaybackState::Ended
        );
        let Some(current_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            return Ok(());
        };

        let prior = self
            .catalog_position(&current_id)
            .and_then(|i| self.catalog[..i].iter().rev().find(|t| t.is_playable()))
            .cloned();

        match prior {
            Some(track) => self.start(track, resume),
            None => Ok(()),
        }
    }

    /// Set the output volume. Values outside `[0, 1]` are clamped; NaN is
    /// rejected.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), SessionError> {
        if volume.is_nan() {
            return Err(SessionError::Validation("volume must be a number".to_string()));
        }
        let clamped = volume.clamp(0.0, 1.0);
        if clamped != volume {
            log::debug!("session: volume {volume} clamped to {clamped}");
        }
        self.volume = clamped;
        self.transport.set_volume(clamped);
        Ok(())
    }

    /// Seek within the current track, clamped to the known duration.
    pub fn seek(&mut self, seconds: f64) {
        if self.current.is_none() || seconds.is_nan() {
            return;
        }
        let mut target = seconds.max(0.0);
        if let Some(d) = self.duration {
            target = target.min(d);
        }
        self.transport.seek(target);
        self.progress = target;
    }

    /// Append a known track to the queue; already-queued tracks are left alone.
    pub fn enqueue(&mut self, track_id: &str) -> Result<(), SessionError> {
        let track = self
            .find_track(track_id)
            .ok_or_else(|| SessionError::NotFound(format!("track {track_id}")))?;
        if !track.is_playable() {
            return Err(SessionError::InvalidTrack(track.id));
        }
        if !self.queue.contains(&track) {
            self.queue.push_back(track);
        }
        Ok(())
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Take the queue entry at `index` out of the queue and play it.
    pub fn play_queued(&mut self, index: usize) -> Result<(), SessionError> {
        let track = self
            .queue
            .remove(index)
            .ok_or_else(|| SessionError::NotFound(format!("queue entry #{index}")))?;
        self.play(track)
    }

    // ----- transport events -----------------------------------------------

    /// Drain and apply pending transport events.
    pub fn poll_transport(&mut self) {
        for event in self.transport.poll_events() {
            self.handle_transport_event(event);
        }
    }

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Ready { token } => {
                if token != self.token {
                    log::debug!("session: ignoring stale ready (token {token})");
                    return;
                }
                match self.pending_load.take() {
                    Some(true) => {
                        if let Err(e) = self.begin_playback() {
                            self.notify(e.into());
                        }
                    }
                    Some(false) => self.state = PlaybackState::Paused,
                    None => {}
                }
            }
            TransportEvent::LoadFailed { token, reason } => {
                if token != self.token || self.pending_load.is_none() {
                    log::debug!("session: ignoring stale load failure (token {token})");
                    return;
                }
                log::warn!("session: playback rejected: {reason}");
                self.go_idle();
                self.notify(SessionError::PlaybackRejected(reason).into());
            }
            TransportEvent::Progress(secs) => {
                if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
                    self.progress = secs.max(0.0);
                }
            }
            TransportEvent::DurationKnown(secs) => {
                if secs > 0.0 && self.current.is_some() {
                    self.duration = Some(secs);
                }
            }
            TransportEvent::Paused => {
                if self.state == PlaybackState::Playing {
                    self.state = PlaybackState::Paused;
                }
            }
            TransportEvent::Ended => {
                if self.current.is_none() {
                    return;
                }
                self.progress = 0.0;
                self.state = PlaybackState::Ended;
                if let Err(e) = self.next() {
                    self.notify(e.into());
                }
            }
            TransportEvent::SeekFailed(reason) => {
                log::info!("session: seek failed: {reason}");
                self.notify(Notice::info(format!("Cannot seek: {reason}")));
            }
            TransportEvent::Error(reason) => {
                log::warn!("session: transport error: {reason}");
                self.go_idle();
                self.notify(Notice::error(format!("Playback error: {reason}")));
            }
        }
    }

    // ----- persistence ------------------------------------------------------

    fn remember_played(&mut self, track: Track) {
        self.recently_played.insert(track);
        persist(
            self.store.as_mut(),
            RECENTLY_PLAYED_KEY,
            self.recently_played.as_slice(),
        );
    }

    pub(super) fn persist_playlists(&mut self) {
        persist(self.store.as_mut(), PLAYLISTS_KEY, &self.playlists);
    }
}

/// Fire-and-forget write; failures are logged and never roll back.
fn persist<V: Serialize + ?Sized>(store: &mut dyn Store, key: &str, value: &V) {
    let result = serde_json::to_value(value)
        .map_err(StoreError::from)
        .and_then(|v| store.write_json(key, &v));
    if let Err(e) = result {
        log::warn!("session: failed to persist '{key}': {e}");
    }
}

fn restore<V: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<V> {
    match store.read_json(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("session: ignoring malformed '{key}': {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("session: failed to read '{key}': {e}");
            None
        }
    }
}

fn dedupe_playlist(mut p: Playlist) -> Playlist {
    let tracks = std::mem::take(&mut p.tracks);
    for t in tracks {
        p.push_unique(t);
    }
    p
}
