use std::cell::Cell;
use std::time::Duration;

use serde_json::json;

use super::wire::{parse_track, parse_track_list};
use super::*;
use crate::error::CatalogError;

fn no_wait(retries: u32) -> FetchPolicy {
    FetchPolicy {
        retries,
        backoff: Duration::ZERO,
    }
}

#[test]
fn parse_track_list_maps_fields_and_numeric_ids() {
    let payload = json!({
        "data": [{
            "id": 3135556,
            "title": "Harder, Better, Faster, Stronger",
            "preview": "https://cdn.test/p.mp3",
            "duration": 224,
            "artist": {"id": 27, "name": "Daft Punk"},
            "album": {"id": 302127, "cover_medium": "https://img.test/c.jpg"}
        }]
    });
    let tracks = parse_track_list(payload).unwrap();
    assert_eq!(tracks.len(), 1);
    let t = &tracks[0];
    assert_eq!(t.id, "3135556");
    assert_eq!(t.artist, "Daft Punk");
    assert_eq!(t.artist_id.as_deref(), Some("27"));
    assert_eq!(t.album_id.as_deref(), Some("302127"));
    assert_eq!(t.album_cover_url, "https://img.test/c.jpg");
    assert_eq!(t.audio_source_url, "https://cdn.test/p.mp3");
    assert_eq!(t.duration_seconds, 224);
}

#[test]
fn parse_track_list_drops_records_without_id_or_title() {
    let payload = json!({
        "data": [
            {"id": "a", "title": "Keep"},
            {"title": "No id"},
            {"id": "b", "title": "   "},
            {"id": "c"}
        ]
    });
    let tracks = parse_track_list(payload).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, "a");
    assert_eq!(tracks[0].artist, "Unknown Artist");
    assert!(!tracks[0].is_playable());
}

#[test]
fn parse_track_list_surfaces_api_errors() {
    let payload = json!({"error": {"type": "DataException", "message": "no data"}});
    assert_eq!(
        parse_track_list(payload),
        Err(CatalogError::Api("DataException: no data".to_string()))
    );
}

#[test]
fn parse_track_list_requires_data_array() {
    assert!(matches!(
        parse_track_list(json!({"total": 0})),
        Err(CatalogError::Malformed(_))
    ));
}

#[test]
fn parse_track_accepts_single_object() {
    let t = parse_track(json!({"id": 9, "title": "One", "artist": {"id": "x", "name": "A"}}))
        .unwrap();
    assert_eq!(t.id, "9");
    assert_eq!(t.artist_id.as_deref(), Some("x"));
}

#[test]
fn artist_id_survives_missing_name() {
    let t = parse_track(json!({"id": 3, "title": "Three", "artist": {"id": 5}})).unwrap();
    assert_eq!(t.artist, "Unknown Artist");
    assert_eq!(t.artist_id.as_deref(), Some("5"));

    let t = parse_track(json!({"id": 4, "title": "Four", "artist": {"name": "Solo"}})).unwrap();
    assert_eq!(t.artist, "Solo");
    assert_eq!(t.artist_id, None);
}

#[test]
fn policy_retries_network_errors_then_succeeds() {
    let calls = Cell::new(0);
    let result = no_wait(2).run("test", || {
        calls.set(calls.get() + 1);
        if calls.get() < 3 {
            Err(CatalogError::Network("reset".into()))
        } else {
            Ok(crate::library::sample_tracks())
        }
    });
    assert!(result.is_ok());
    assert_eq!(calls.get(), 3);
}

#[test]
fn policy_does_not_retry_client_errors() {
    let calls = Cell::new(0);
    let result = no_wait(5).run("test", || {
        calls.set(calls.get() + 1);
        Err(CatalogError::Status(404))
    });
    assert_eq!(result, Err(CatalogError::Status(404)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn policy_treats_empty_results_as_failure() {
    let result = no_wait(3).run("test", || Ok(Vec::new()));
    assert_eq!(result, Err(CatalogError::Empty));
}

#[test]
fn policy_gives_up_after_configured_retries() {
    let calls = Cell::new(0);
    let result = no_wait(1).run("test", || {
        calls.set(calls.get() + 1);
        Err(CatalogError::Status(503))
    });
    assert_eq!(result, Err(CatalogError::Status(503)));
    assert_eq!(calls.get(), 2);
}

#[test]
fn http_catalog_builds_encoded_urls() {
    let c = HttpCatalog::new("https://api.test/", Duration::from_secs(1), no_wait(0));
    assert_eq!(
        c.url_for_test("search", &[("q", "daft punk".to_string())]),
        "https://api.test/search?q=daft%20punk"
    );
    assert_eq!(c.url_for_test("/chart/0/tracks", &[]), "https://api.test/chart/0/tracks");
}

#[test]
fn http_catalog_rejects_blank_search_without_network() {
    let c = HttpCatalog::new("http://127.0.0.1:9", Duration::from_millis(50), no_wait(0));
    assert_eq!(c.search("   "), Err(CatalogError::Empty));
}

#[test]
fn offline_catalog_refuses_everything() {
    let c = OfflineCatalog;
    assert_eq!(c.search("x"), Err(CatalogError::Disabled));
    assert_eq!(c.chart(10), Err(CatalogError::Disabled));
    assert_eq!(c.recommendations("1"), Err(CatalogError::Disabled));
    assert_eq!(c.artist_top_tracks("1"), Err(CatalogError::Disabled));
}
