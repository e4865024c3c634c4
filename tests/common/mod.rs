use async_trait::async_trait;
use music_playlist_client::api::mock::MockBackend;
use music_playlist_client::api::Backend;
use music_playlist_client::models::{Credentials, Playlist, PlaylistDraft, Song};
use music_playlist_client::{ClientError, Result};

/// Delegates to a `MockBackend` but every playlist listing times out.
pub struct ListingDown {
    pub inner: MockBackend,
}

impl ListingDown {
    pub fn new() -> Self {
        Self {
            inner: MockBackend::demo(),
        }
    }
}

#[async_trait]
impl Backend for ListingDown {
    fn name(&self) -> &str {
        "listing-down"
    }

    async fn register(&self, creds: &Credentials) -> Result<String> {
        self.inner.register(creds).await
    }

    async fn login(&self, creds: &Credentials) -> Result<String> {
        self.inner.login(creds).await
    }

    async fn list_playlists(&self, _token: &str) -> Result<Vec<Playlist>> {
        Err(ClientError::Network("timeout".into()))
    }

    async fn create_playlist(&self, token: &str, draft: &PlaylistDraft) -> Result<Playlist> {
        self.inner.create_playlist(token, draft).await
    }

    async fn update_playlist(&self, token: &str, id: &str, draft: &PlaylistDraft) -> Result<Playlist> {
        self.inner.update_playlist(token, id, draft).await
    }

    async fn delete_playlist(&self, token: &str, id: &str) -> Result<()> {
        self.inner.delete_playlist(token, id).await
    }

    async fn search_songs(&self, token: &str, query: &str) -> Result<Vec<Song>> {
        self.inner.search_songs(token, query).await
    }

    async fn add_song(&self, token: &str, playlist_id: &str, song: &Song) -> Result<()> {
        self.inner.add_song(token, playlist_id, song).await
    }
}
