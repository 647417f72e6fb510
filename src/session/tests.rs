use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use super::*;
use crate::error::{CatalogError, SessionError, StoreError, TransportError};
use crate::library::Track;
use crate::store::{MemoryStore, PLAYLISTS_KEY, RECENTLY_PLAYED_KEY, Store};
use crate::transport::{LoadStatus, Transport, TransportEvent};

#[derive(Default)]
struct FakeTransport {
    calls: Vec<String>,
    loaded: Option<String>,
    volume: Option<f32>,
    reject_load: bool,
    reject_play: bool,
    /// Answer loads with `Pending`, like a remote source being fetched.
    async_load: bool,
    pending: Vec<TransportEvent>,
}

impl Transport for FakeTransport {
    fn load(&mut self, url: &str, _token: u64) -> Result<LoadStatus, TransportError> {
        self.calls.push(format!("load {url}"));
        if self.reject_load {
            return Err(TransportError::Source {
                url: url.to_string(),
                reason: "unreachable".to_string(),
            });
        }
        self.loaded = Some(url.to_string());
        if self.async_load {
            Ok(LoadStatus::Pending)
        } else {
            Ok(LoadStatus::Ready)
        }
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.calls.push("play".to_string());
        if self.reject_play || self.loaded.is_none() {
            return Err(TransportError::NothingLoaded);
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push("pause".to_string());
    }

    fn stop(&mut self) {
        self.calls.push("stop".to_string());
        self.loaded = None;
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.push(format!("seek {seconds}"));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Some(volume);
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl Store for SharedStore {
    fn read_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.0.borrow().read_json(key)
    }

    fn write_json(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.0.borrow_mut().write_json(key, value)
    }
}

struct FailingStore;

impl Store for FailingStore {
    fn read_json(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    fn write_json(&mut self, _key: &str, _value: &Value) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }
}

fn t(id: &str) -> Track {
    Track {
        id: id.into(),
        title: format!("Song {id}"),
        artist: "Artist".into(),
        album_cover_url: String::new(),
        audio_source_url: format!("https://cdn.test/{id}.mp3"),
        duration_seconds: 180,
        artist_id: Some("artist-1".into()),
        album_id: None,
    }
}

fn session_with_store(catalog: &[&str], store: Box<dyn Store>) -> Session<FakeTransport> {
    let mut s = Session::new(FakeTransport::default(), store);
    s.apply_chart(Ok(catalog.iter().map(|id| t(id)).collect()));
    s.take_notices();
    s
}

fn session(catalog: &[&str]) -> Session<FakeTransport> {
    session_with_store(catalog, Box::new(MemoryStore::new()))
}

fn ids<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Vec<&'a str> {
    tracks.into_iter().map(|t| t.id.as_str()).collect()
}

fn assert_invariants(s: &Session<FakeTransport>) {
    if s.is_playing() {
        assert!(s.current_track().is_some());
    }
    assert!(s.recently_played().len() <= RECENTLY_PLAYED_LIMIT);
    assert!((0.0..=1.0).contains(&s.volume()));
    assert!(s.progress() >= 0.0);
}

#[test]
fn play_sets_current_playing_and_records_history() {
    let mut s = session(&["A", "B"]);
    s.handle_transport_event(TransportEvent::Progress(42.0));

    s.play(t("B")).unwrap();

    assert_eq!(s.current_track(), Some(&t("B")));
    assert!(s.is_playing());
    assert_eq!(s.state(), PlaybackState::Playing);
    assert_eq!(s.progress(), 0.0);
    assert_eq!(ids(s.recently_played()), vec!["B"]);
    assert_eq!(
        s.transport().calls,
        vec!["load https://cdn.test/B.mp3".to_string(), "play".to_string()]
    );
    assert_invariants(&s);
}

#[test]
fn play_without_audio_source_is_rejected_without_state_change() {
    let mut s = session(&["A"]);
    let mut bad = t("X");
    bad.audio_source_url = "   ".into();

    assert_eq!(s.play(bad), Err(SessionError::InvalidTrack("X".into())));
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(s.current_track().is_none());
    assert!(s.recently_played().is_empty());
    assert!(s.transport().calls.is_empty());
    assert!(s.take_requests().is_empty());
}

#[test]
fn rejected_playback_falls_back_to_idle() {
    let mut s = session(&["A"]);
    s.transport.reject_play = true;

    let err = s.play(t("A")).unwrap_err();
    assert!(matches!(err, SessionError::PlaybackRejected(_)));
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.is_playing());
    assert!(s.current_track().is_none());
    assert!(s.take_requests().is_empty());
    assert_invariants(&s);
}

#[test]
fn unreachable_source_is_reported_as_rejected() {
    let mut s = session(&["A"]);
    s.transport.reject_load = true;

    assert!(matches!(s.play(t("A")), Err(SessionError::PlaybackRejected(_))));
    assert_eq!(s.state(), PlaybackState::Idle);
}

#[test]
fn replaying_a_track_moves_it_to_the_front_once() {
    let mut s = session(&["A", "B"]);
    s.play(t("A")).unwrap();
    s.play(t("B")).unwrap();
    s.play(t("A")).unwrap();

    assert_eq!(ids(s.recently_played()), vec!["A", "B"]);
}

#[test]
fn recently_played_never_exceeds_limit() {
    let mut recent = RecentlyPlayed::default();
    for i in 0..50 {
        recent.insert(t(&i.to_string()));
    }
    assert_eq!(recent.len(), RECENTLY_PLAYED_LIMIT);
    assert_eq!(recent.as_slice()[0].id, "49");

    let mut s = session(&[]);
    for i in 0..25 {
        s.play(t(&format!("t{i}"))).unwrap();
        assert_invariants(&s);
    }
    assert_eq!(s.recently_played().len(), RECENTLY_PLAYED_LIMIT);
}

#[test]
fn recently_played_from_tracks_dedupes_and_caps() {
    let mut tracks: Vec<Track> = (0..30).map(|i| t(&i.to_string())).collect();
    tracks.insert(1, t("0"));
    let recent = RecentlyPlayed::from_tracks(tracks);
    assert_eq!(recent.len(), RECENTLY_PLAYED_LIMIT);
    assert_eq!(ids(recent.as_slice())[..3], ["0", "1", "2"]);
}

#[test]
fn resume_same_paused_track_does_not_reload() {
    let mut s = session(&["A"]);
    s.play(t("A")).unwrap();
    s.pause();
    assert_eq!(s.state(), PlaybackState::Paused);

    s.transport.calls.clear();
    s.play(t("A")).unwrap();
    assert!(s.is_playing());
    assert_eq!(s.transport().calls, vec!["play".to_string()]);
}

#[test]
fn toggle_playback_cycles_and_starts_catalog_when_idle() {
    let mut s = session(&["A", "B"]);
    s.toggle_playback().unwrap();
    assert_eq!(s.current_track(), Some(&t("A")));
    assert!(s.is_playing());

    s.toggle_playback().unwrap();
    assert_eq!(s.state(), PlaybackState::Paused);

    s.toggle_playback().unwrap();
    assert!(s.is_playing());
}

#[test]
fn recommendations_failure_falls_back_to_rest_of_catalog() {
    let mut s = session(&["A", "B", "C"]);
    s.play(t("A")).unwrap();

    let requests = s.take_requests();
    assert_eq!(
        requests,
        vec![FetchRequest::Recommendations {
            token: s.token(),
            track_id: "A".into()
        }]
    );

    assert!(s.apply_recommendations(s.token(), Err(CatalogError::Network("down".into()))));
    assert_eq!(ids(s.queue()), vec!["B", "C"]);
    let notices = s.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);

    s.next().unwrap();
    assert_eq!(s.current_track(), Some(&t("B")));
    assert_eq!(ids(s.queue()), vec!["C"]);
    assert!(s.is_playing());
}

#[test]
fn recommendations_success_replaces_queue_without_current() {
    let mut s = session(&["A", "B", "C"]);
    s.play(t("A")).unwrap();
    let applied = s.apply_outcome(FetchOutcome {
        request: FetchRequest::Recommendations {
            token: s.token(),
            track_id: "A".into(),
        },
        result: Ok(vec![t("A"), t("X"), t("Y")]),
    });
    assert!(applied);
    assert_eq!(ids(s.queue()), vec!["X", "Y"]);
    assert!(s.take_notices().is_empty());
}

#[test]
fn stale_recommendations_are_discarded() {
    let mut s = session(&["A", "B", "C"]);
    s.play(t("A")).unwrap();
    let stale = s.token();
    s.play(t("B")).unwrap();

    assert!(!s.apply_recommendations(stale, Ok(vec![t("X")])));
    assert!(s.queue().is_empty());

    assert!(s.apply_recommendations(s.token(), Ok(vec![t("Y")])));
    assert_eq!(ids(s.queue()), vec!["Y"]);
}

#[test]
fn play_with_non_empty_queue_does_not_request_recommendations() {
    let mut s = session(&["A", "B"]);
    s.enqueue("B").unwrap();
    s.play(t("A")).unwrap();
    assert!(s.take_requests().is_empty());
}

#[test]
fn next_at_catalog_end_goes_idle() {
    let mut s = session(&["A", "B"]);
    s.play(t("B")).unwrap();
    s.next().unwrap();

    assert!(s.current_track().is_none());
    assert!(!s.is_playing());
    assert_eq!(s.state(), PlaybackState::Idle);
    assert_eq!(s.transport().calls.last().map(String::as_str), Some("stop"));
}

#[test]
fn next_walks_catalog_when_queue_empty() {
    let mut s = session(&["A", "B", "C"]);
    s.play(t("A")).unwrap();
    s.next().unwrap();
    assert_eq!(s.current_track(), Some(&t("B")));
    assert_eq!(ids(s.recently_played()), vec!["B", "A"]);
}

#[test]
fn next_skips_unplayable_entries() {
    let mut s = session(&["A", "B", "C"]);
    s.catalog[1].audio_source_url.clear();
    s.play(t("A")).unwrap();
    s.next().unwrap();
    assert_eq!(s.current_track(), Some(&t("C")));
}

#[test]
fn next_while_paused_advances_but_stays_paused() {
    let mut s = session(&["A", "B"]);
    s.play(t("A")).unwrap();
    s.pause();
    s.transport.calls.clear();

    s.next().unwrap();
    assert_eq!(s.current_track(), Some(&t("B")));
    assert_eq!(s.state(), PlaybackState::Paused);
    assert_eq!(s.transport().calls, vec!["load https://cdn.test/B.mp3".to_string()]);
}

#[test]
fn next_without_current_track_is_noop() {
    let mut s = session(&["A"]);
    s.next().unwrap();
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(s.transport().calls.is_empty());
}

#[test]
fn previous_after_threshold_restarts_current_track() {
    let mut s = session(&["A", "B"]);
    s.play(t("B")).unwrap();
    s.handle_transport_event(TransportEvent::Progress(12.5));
    assert_eq!(s.progress(), 12.5);

    s.previous().unwrap();
    assert_eq!(s.current_track(), Some(&t("B")));
    assert_eq!(s.progress(), 0.0);
    assert_eq!(s.transport().calls.last().map(String::as_str), Some("seek 0"));
}

#[test]
fn previous_within_threshold_steps_back_and_is_noop_at_start() {
    let mut s = session(&["A", "B"]);
    s.play(t("B")).unwrap();
    s.handle_transport_event(TransportEvent::Progress(2.0));

    s.previous().unwrap();
    assert_eq!(s.current_track(), Some(&t("A")));
    assert!(s.is_playing());

    s.previous().unwrap();
    assert_eq!(s.current_track(), Some(&t("A")));
}

#[test]
fn ended_event_resets_progress_and_advances() {
    let mut s = session(&["A", "B"]);
    s.play(t("A")).unwrap();
    s.handle_transport_event(TransportEvent::Progress(179.0));
    s.transport.pending.push(TransportEvent::Ended);

    s.poll_transport();
    assert_eq!(s.current_track(), Some(&t("B")));
    assert_eq!(s.progress(), 0.0);
    assert!(s.is_playing());
}

#[test]
fn ended_on_last_track_goes_idle() {
    let mut s = session(&["A"]);
    s.play(t("A")).unwrap();
    s.handle_transport_event(TransportEvent::Ended);
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(s.current_track().is_none());
}

#[test]
fn external_pause_and_errors_are_reflected() {
    let mut s = session(&["A"]);
    s.play(t("A")).unwrap();
    s.handle_transport_event(TransportEvent::Paused);
    assert_eq!(s.state(), PlaybackState::Paused);

    s.handle_transport_event(TransportEvent::Error("device lost".into()));
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(s.current_track().is_none());
    let notices = s.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[test]
fn pending_load_plays_once_transport_is_ready() {
    let mut s = session(&["A", "B"]);
    s.transport.async_load = true;

    s.play(t("A")).unwrap();
    assert_eq!(s.state(), PlaybackState::Loading);
    assert_eq!(s.current_track(), Some(&t("A")));
    assert!(!s.transport().calls.contains(&"play".to_string()));

    let token = s.token();
    s.transport.pending.push(TransportEvent::Ready { token });
    s.poll_transport();
    assert_eq!(s.state(), PlaybackState::Playing);
    assert_eq!(s.transport().calls.last().map(String::as_str), Some("play"));
    assert_invariants(&s);
}

#[test]
fn stale_ready_is_ignored_and_failed_load_goes_idle() {
    let mut s = session(&["A", "B"]);
    s.transport.async_load = true;
    s.play(t("A")).unwrap();
    let stale = s.token();
    s.play(t("B")).unwrap();

    s.handle_transport_event(TransportEvent::Ready { token: stale });
    assert_eq!(s.state(), PlaybackState::Loading);
    assert_eq!(s.current_track(), Some(&t("B")));

    s.handle_transport_event(TransportEvent::LoadFailed {
        token: stale,
        reason: "timed out".into(),
    });
    assert_eq!(s.state(), PlaybackState::Loading);

    let token = s.token();
    s.handle_transport_event(TransportEvent::LoadFailed {
        token,
        reason: "timed out".into(),
    });
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(s.current_track().is_none());
    let notices = s.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("timed out"));
}

#[test]
fn pause_during_pending_load_holds_until_resumed() {
    let mut s = session(&["A"]);
    s.transport.async_load = true;
    s.play(t("A")).unwrap();
    s.toggle_playback().unwrap();
    assert_eq!(s.state(), PlaybackState::Paused);

    let token = s.token();
    s.handle_transport_event(TransportEvent::Ready { token });
    assert_eq!(s.state(), PlaybackState::Paused);
    assert!(!s.transport().calls.contains(&"play".to_string()));

    s.toggle_playback().unwrap();
    assert_eq!(s.state(), PlaybackState::Playing);
}

#[test]
fn failed_seek_keeps_track_and_state() {
    let mut s = session(&["A", "B"]);
    s.play(t("A")).unwrap();
    s.seek(30.0);

    s.handle_transport_event(TransportEvent::SeekFailed("not seekable".into()));
    assert_eq!(s.current_track(), Some(&t("A")));
    assert_eq!(s.state(), PlaybackState::Playing);
    let notices = s.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
}

#[test]
fn duration_known_overrides_metadata() {
    let mut s = session(&["A"]);
    s.play(t("A")).unwrap();
    assert_eq!(s.duration(), Some(180.0));
    s.handle_transport_event(TransportEvent::DurationKnown(29.9));
    assert_eq!(s.duration(), Some(29.9));
}

#[test]
fn seek_is_clamped_to_known_duration() {
    let mut s = session(&["A"]);
    s.seek(10.0);
    assert!(s.transport().calls.is_empty());

    s.play(t("A")).unwrap();
    s.seek(500.0);
    assert_eq!(s.progress(), 180.0);
    s.seek(-4.0);
    assert_eq!(s.progress(), 0.0);
}

#[test]
fn volume_is_applied_to_state_and_transport() {
    let mut s = session(&["A"]);
    s.set_volume(0.0).unwrap();
    s.set_volume(0.5).unwrap();
    s.set_volume(0.5).unwrap();
    assert_eq!(s.volume(), 0.5);
    assert_eq!(s.transport().volume, Some(0.5));
}

#[test]
fn volume_out_of_range_is_clamped_and_nan_rejected() {
    let mut s = session(&["A"]);
    s.set_volume(1.7).unwrap();
    assert_eq!(s.volume(), 1.0);
    s.set_volume(-0.2).unwrap();
    assert_eq!(s.volume(), 0.0);

    assert!(matches!(s.set_volume(f32::NAN), Err(SessionError::Validation(_))));
    assert_eq!(s.volume(), 0.0);
}

#[test]
fn create_playlist_rejects_blank_names() {
    let mut s = session(&["A"]);
    assert!(matches!(s.create_playlist(""), Err(SessionError::Validation(_))));
    assert!(matches!(s.create_playlist("   "), Err(SessionError::Validation(_))));
    assert!(s.playlists().is_empty());

    let id = s.create_playlist(" Focus ").unwrap();
    assert_eq!(s.playlist(&id).map(|p| p.name.as_str()), Some("Focus"));
}

#[test]
fn add_to_playlist_is_idempotent() {
    let mut s = session(&["A", "B"]);
    let id = s.create_playlist("Mix").unwrap();

    s.add_to_playlist(&id, "A").unwrap();
    let once = ids(&s.playlist(&id).unwrap().tracks)
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();

    let again = s.add_to_playlist(&id, "A");
    assert!(matches!(again, Err(SessionError::AlreadyInPlaylist { .. })));
    assert_eq!(ids(&s.playlist(&id).unwrap().tracks), once);
}

#[test]
fn add_to_playlist_reports_unknown_ids() {
    let mut s = session(&["A"]);
    let id = s.create_playlist("Mix").unwrap();
    assert!(matches!(s.add_to_playlist("nope", "A"), Err(SessionError::NotFound(_))));
    assert!(matches!(s.add_to_playlist(&id, "nope"), Err(SessionError::NotFound(_))));
    assert!(s.playlist(&id).unwrap().tracks.is_empty());
}

#[test]
fn remove_from_playlist_is_noop_for_absent_track() {
    let mut s = session(&["A", "B"]);
    let id = s.create_playlist("Mix").unwrap();
    s.add_to_playlist(&id, "A").unwrap();

    s.remove_from_playlist(&id, "B").unwrap();
    assert_eq!(ids(&s.playlist(&id).unwrap().tracks), vec!["A"]);

    s.remove_from_playlist(&id, "A").unwrap();
    assert!(s.playlist(&id).unwrap().tracks.is_empty());

    assert!(matches!(
        s.remove_from_playlist("nope", "A"),
        Err(SessionError::NotFound(_))
    ));
}

#[test]
fn rename_and_delete_playlist() {
    let mut s = session(&["A"]);
    let id = s.create_playlist("Old").unwrap();
    assert!(matches!(s.rename_playlist(&id, " "), Err(SessionError::Validation(_))));
    s.rename_playlist(&id, "New").unwrap();
    assert_eq!(s.playlist(&id).unwrap().name, "New");

    s.delete_playlist(&id).unwrap();
    assert!(s.playlists().is_empty());
    assert!(matches!(s.delete_playlist(&id), Err(SessionError::NotFound(_))));
}

#[test]
fn play_playlist_queues_following_tracks() {
    let mut s = session(&["A", "B", "C"]);
    let id = s.create_playlist("Mix").unwrap();
    for track in ["C", "A", "B"] {
        s.add_to_playlist(&id, track).unwrap();
    }

    s.play_playlist(&id, 0).unwrap();
    assert_eq!(s.current_track(), Some(&t("C")));
    assert_eq!(ids(s.queue()), vec!["A", "B"]);
    assert!(s.take_requests().is_empty());

    s.next().unwrap();
    assert_eq!(s.current_track(), Some(&t("A")));

    assert!(matches!(s.play_playlist(&id, 9), Err(SessionError::NotFound(_))));
}

#[test]
fn enqueue_appends_known_tracks_once() {
    let mut s = session(&["A", "B"]);
    s.enqueue("B").unwrap();
    s.enqueue("B").unwrap();
    assert_eq!(ids(s.queue()), vec!["B"]);
    assert!(matches!(s.enqueue("nope"), Err(SessionError::NotFound(_))));
}

#[test]
fn play_by_id_resolves_known_tracks() {
    let mut s = session(&["A", "B"]);
    s.play_by_id("B").unwrap();
    assert_eq!(s.current_track(), Some(&t("B")));
    assert!(matches!(s.play_by_id("Z"), Err(SessionError::NotFound(_))));
    assert_eq!(s.current_track(), Some(&t("B")));
}

#[test]
fn play_queued_takes_entry_out_of_queue() {
    let mut s = session(&["A", "B", "C"]);
    s.enqueue("B").unwrap();
    s.enqueue("C").unwrap();

    s.play_queued(1).unwrap();
    assert_eq!(s.current_track(), Some(&t("C")));
    assert_eq!(ids(s.queue()), vec!["B"]);
    assert!(matches!(s.play_queued(5), Err(SessionError::NotFound(_))));
    assert_invariants(&s);
}

#[test]
fn playlists_and_history_survive_restart() {
    let store = SharedStore::default();
    let playlist_id = {
        let mut s = session_with_store(&["A", "B"], Box::new(store.clone()));
        let id = s.create_playlist("Keep").unwrap();
        s.add_to_playlist(&id, "B").unwrap();
        s.play(t("A")).unwrap();
        id
    };

    assert!(store.0.borrow().get(PLAYLISTS_KEY).is_some());
    assert!(store.0.borrow().get(RECENTLY_PLAYED_KEY).is_some());

    let s = Session::new(FakeTransport::default(), Box::new(store));
    assert_eq!(ids(&s.playlist(&playlist_id).unwrap().tracks), vec!["B"]);
    assert_eq!(ids(s.recently_played()), vec!["A"]);
}

#[test]
fn malformed_persisted_data_is_ignored() {
    let store = SharedStore::default();
    store
        .0
        .borrow_mut()
        .write_json(PLAYLISTS_KEY, &serde_json::json!({"not": "a list"}))
        .unwrap();
    let s = Session::new(FakeTransport::default(), Box::new(store));
    assert!(s.playlists().is_empty());
}

#[test]
fn persistence_failure_keeps_in_memory_state() {
    let mut s = session_with_store(&["A"], Box::new(FailingStore));
    let id = s.create_playlist("Still here").unwrap();
    s.add_to_playlist(&id, "A").unwrap();
    s.play(t("A")).unwrap();

    assert_eq!(s.playlists().len(), 1);
    assert_eq!(s.recently_played().len(), 1);
    assert!(s.take_notices().is_empty());
}

#[test]
fn search_failure_falls_back_to_sample_filter() {
    let mut s = session(&["A"]);
    let seq = s.begin_search("Neon");
    assert_eq!(
        s.take_requests(),
        vec![FetchRequest::Search {
            seq,
            query: "Neon".into()
        }]
    );

    assert!(s.apply_search(seq, "Neon", Err(CatalogError::Status(500))));
    assert_eq!(s.search_results().len(), 1);
    assert_eq!(s.search_results()[0].title, "Neon Avenue");
    assert_eq!(s.take_notices()[0].level, NoticeLevel::Info);
}

#[test]
fn stale_search_results_are_dropped() {
    let mut s = session(&["A"]);
    let first = s.begin_search("a");
    let second = s.begin_search("ab");

    assert!(!s.apply_search(first, "a", Ok(vec![t("old")])));
    assert!(s.search_results().is_empty());
    assert!(s.apply_search(second, "ab", Ok(vec![t("new")])));
    assert_eq!(ids(s.search_results()), vec!["new"]);
}

#[test]
fn chart_failure_uses_sample_catalog() {
    let mut s = session(&["A"]);
    s.apply_chart(Err(CatalogError::Disabled));
    assert_eq!(s.catalog().len(), crate::library::sample_tracks().len());
    assert_eq!(s.take_notices().len(), 1);
}

#[test]
fn artist_browse_falls_back_to_matching_samples() {
    let mut s = session(&["A"]);
    let seq = s.browse_artist("soundhelix");
    assert!(s.apply_artist_top(seq, "soundhelix", Err(CatalogError::Empty)));
    assert_eq!(s.search_results().len(), crate::library::sample_tracks().len());

    s.clear_search();
    assert!(s.search_results().is_empty());
    assert!(!s.apply_artist_top(seq, "soundhelix", Ok(vec![t("late")])));
}
