use crate::error::SessionError;
use crate::library::Playlist;
use crate::transport::Transport;

use super::controller::Session;

impl<T: Transport> Session<T> {
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    #[cfg(test)]
    pub fn playlist(&self, playlist_id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == playlist_id)
    }

    fn playlist_index(&self, playlist_id: &str) -> Result<usize, SessionError> {
        self.playlists
            .iter()
            .position(|p| p.id == playlist_id)
            .ok_or_else(|| SessionError::NotFound(format!("playlist {playlist_id}")))
    }

    /// Create an empty playlist and return its id.
    pub fn create_playlist(&mut self, name: &str) -> Result<String, SessionError> {
        validate_name(name)?;
        let playlist = Playlist::new(name);
        let id = playlist.id.clone();
        log::info!("session: created playlist '{}'", playlist.name);
        self.playlists.push(playlist);
        self.persist_playlists();
        Ok(id)
    }

    pub fn rename_playlist(&mut self, playlist_id: &str, name: &str) -> Result<(), SessionError> {
        validate_name(name)?;
        let idx = self.playlist_index(playlist_id)?;
        self.playlists[idx].name = name.trim().to_string();
        self.persist_playlists();
        Ok(())
    }

    pub fn delete_playlist(&mut self, playlist_id: &str) -> Result<(), SessionError> {
        let idx = self.playlist_index(playlist_id)?;
        let removed = self.playlists.remove(idx);
        log::info!("session: deleted playlist '{}'", removed.name);
        self.persist_playlists();
        Ok(())
    }

    /// Append a known track to a playlist. Adding a track that is already
    /// there reports `AlreadyInPlaylist` and leaves the playlist unchanged.
    pub fn add_to_playlist(&mut self, playlist_id: &str, track_id: &str) -> Result<(), SessionError> {
        let idx = self.playlist_index(playlist_id)?;
        let track = self
            .find_track(track_id)
            .ok_or_else(|| SessionError::NotFound(format!("track {track_id}")))?;

        let playlist = &mut self.playlists[idx];
        if playlist.contains(&track.id) {
            return Err(SessionError::AlreadyInPlaylist {
                playlist: playlist.name.clone(),
                track: track.title,
            });
        }
        playlist.push_unique(track);
        self.persist_playlists();
        Ok(())
    }

    /// Remove a track from a playlist; absent tracks are a no-op.
    pub fn remove_from_playlist(
        &mut self,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<(), SessionError> {
        let idx = self.playlist_index(playlist_id)?;
        if self.playlists[idx].remove(track_id) {
            self.persist_playlists();
        }
        Ok(())
    }

    /// Play the playlist from `start`, queueing the tracks after it.
    pub fn play_playlist(&mut self, playlist_id: &str, start: usize) -> Result<(), SessionError> {
        let idx = self.playlist_index(playlist_id)?;
        let tracks = &self.playlists[idx].tracks;
        let Some(first) = tracks.get(start).cloned() else {
            return Err(SessionError::NotFound(format!(
                "track #{start} in playlist {playlist_id}"
            )));
        };
        let rest = tracks[start + 1..].to_vec();

        let previous_queue = std::mem::replace(&mut self.queue, rest.into());
        let result = self.play(first);
        if result.is_err() {
            self.queue = previous_queue;
        }
        result
    }
}

fn validate_name(name: &str) -> Result<(), SessionError> {
    if name.trim().is_empty() {
        return Err(SessionError::Validation(
            "playlist name must not be empty".to_string(),
        ));
    }
    Ok(())
}
