//! Built-in sample catalog.
//!
//! Used whenever the remote catalog is unreachable, disabled or returns
//! nothing usable, so read paths always have something to show.

use std::sync::LazyLock;

use super::model::Track;

static SAMPLE_TRACKS: LazyLock<Vec<Track>> = LazyLock::new(|| {
    let raw: [(&str, &str, &str, &str, u32); 8] = [
        ("sample-1", "Morning Drive", "SoundHelix", "1", 372),
        ("sample-2", "Neon Avenue", "SoundHelix", "2", 425),
        ("sample-3", "Glass Harbor", "SoundHelix", "3", 344),
        ("sample-4", "Paper Satellites", "SoundHelix", "4", 302),
        ("sample-5", "Low Tide Lights", "SoundHelix", "5", 353),
        ("sample-6", "Copper Skyline", "SoundHelix", "6", 425),
        ("sample-7", "Velvet Static", "SoundHelix", "7", 447),
        ("sample-8", "Last Train North", "SoundHelix", "8", 323),
    ];

    raw.iter()
        .map(|(id, title, artist, n, secs)| Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            album_cover_url: String::new(),
            audio_source_url: format!(
                "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{}.mp3",
                n
            ),
            duration_seconds: *secs,
            artist_id: Some("soundhelix".to_string()),
            album_id: Some("soundhelix-examples".to_string()),
        })
        .collect()
});

/// The full sample set, in catalog order.
pub fn sample_tracks() -> Vec<Track> {
    SAMPLE_TRACKS.clone()
}

/// Case-insensitive substring match on title or artist. A blank query
/// returns the whole set.
pub fn search_samples(query: &str) -> Vec<Track> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return sample_tracks();
    }
    SAMPLE_TRACKS
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&q) || t.artist.to_lowercase().contains(&q))
        .cloned()
        .collect()
}
