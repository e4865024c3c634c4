pub mod http;
pub mod mock;

use crate::error::Result;
use crate::models::{AuthMode, Credentials, Playlist, PlaylistDraft, Song};

/// Backend trait: one operation per endpoint of the playlist backend.
/// Implementations: http::HttpBackend and mock::MockBackend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// POST /api/register, returns the issued token.
    async fn register(&self, creds: &Credentials) -> Result<String>;

    /// POST /api/login, returns the issued token.
    async fn login(&self, creds: &Credentials) -> Result<String>;

    /// Dispatch to `login` or `register`.
    async fn authenticate(&self, creds: &Credentials, mode: AuthMode) -> Result<String> {
        match mode {
            AuthMode::Login => self.login(creds).await,
            AuthMode::Register => self.register(creds).await,
        }
    }

    /// Full playlist collection of the token's owner, in backend order.
    async fn list_playlists(&self, token: &str) -> Result<Vec<Playlist>>;

    async fn create_playlist(&self, token: &str, draft: &PlaylistDraft) -> Result<Playlist>;

    async fn update_playlist(&self, token: &str, id: &str, draft: &PlaylistDraft) -> Result<Playlist>;

    async fn delete_playlist(&self, token: &str, id: &str) -> Result<()>;

    /// Catalog search. No minimum query length is imposed.
    async fn search_songs(&self, token: &str, query: &str) -> Result<Vec<Song>>;

    /// Append a song to the playlist's persisted sequence.
    async fn add_song(&self, token: &str, playlist_id: &str, song: &Song) -> Result<()>;

    /// Return the backend's name (for logging)
    fn name(&self) -> &str;
}
