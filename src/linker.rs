use crate::error::Result;
use crate::models::Song;
use crate::session::Session;
use crate::store::PlaylistStore;
use std::fmt;

/// A playlist offered as a destination for a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachTarget {
    pub id: String,
    pub name: String,
}

/// Confirmation that a song was added; the presentation layer shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attached {
    pub playlist_id: String,
    pub playlist_name: Option<String>,
    pub song_name: String,
}

impl fmt::Display for Attached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Song added to playlist!")?;
        match &self.playlist_name {
            Some(n) => write!(f, " ({} -> {})", self.song_name, n),
            None => write!(f, " ({})", self.song_name),
        }
    }
}

/// Attaches search results to playlists held by the store.
pub struct PlaylistSongLinker<'a> {
    store: &'a mut PlaylistStore,
}

impl<'a> PlaylistSongLinker<'a> {
    pub fn new(store: &'a mut PlaylistStore) -> Self {
        Self { store }
    }

    pub fn targets(&self) -> Vec<AttachTarget> {
        Self::targets_of(self.store)
    }

    /// Candidate playlists from the store's in-memory collection. Never
    /// fetches; reflects whatever the last refresh loaded.
    pub fn targets_of(store: &PlaylistStore) -> Vec<AttachTarget> {
        store
            .playlists()
            .iter()
            .map(|p| AttachTarget {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect()
    }

    pub async fn attach(&mut self, session: &Session, playlist_id: &str, song: &Song) -> Result<Attached> {
        let playlist_name = self.store.find(playlist_id).map(|p| p.name.clone());
        self.store.add_song(session, playlist_id, song).await?;
        Ok(Attached {
            playlist_id: playlist_id.to_string(),
            playlist_name,
            song_name: song.name.clone(),
        })
    }
}
