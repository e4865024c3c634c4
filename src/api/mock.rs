use super::Backend;
use crate::error::{ClientError, Result};
use crate::models::{Credentials, Playlist, PlaylistDraft, Song};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

#[derive(Default)]
struct State {
    // email -> password
    accounts: HashMap<String, String>,
    // token -> email
    tokens: HashMap<String, String>,
    // email -> playlists in creation order
    playlists: HashMap<String, Vec<Playlist>>,
}

/// In-memory backend used in tests and by the CLI's offline mode.
/// It behaves like the real service: per-account playlists, server-assigned
/// ids, token checks on every call. Every call is counted.
pub struct MockBackend {
    state: Mutex<State>,
    catalog: Vec<Song>,
    calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_catalog(Vec::new())
    }

    pub fn with_catalog(catalog: Vec<Song>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            catalog,
            calls: AtomicUsize::new(0),
        }
    }

    /// A few well-known tracks, enough to exercise search and attach.
    pub fn demo() -> Self {
        let mut catalog = vec![
            Song::new("One More Time", "Daft Punk", "Discovery"),
            Song::new("Get Lucky", "Daft Punk", "Random Access Memories"),
            Song::new("Harder, Better, Faster, Stronger", "Daft Punk", "Discovery"),
            Song::new("Midnight City", "M83", "Hurry Up, We're Dreaming"),
            Song::new("Windowlicker", "Aphex Twin", "Windowlicker"),
        ];
        for (i, s) in catalog.iter_mut().enumerate() {
            s.spotify_id = Some(format!("mock{:04}", i));
        }
        Self::with_catalog(catalog)
    }

    /// Number of backend calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Invalidate every issued token, as an expiry on the server would.
    pub async fn revoke_tokens(&self) {
        self.state.lock().await.tokens.clear();
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn owner(state: &State, token: &str) -> Result<String> {
        state
            .tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ClientError::Auth("invalid or expired token".into()))
    }

    fn issue_token(state: &mut State, email: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        state.tokens.insert(token.clone(), email.to_string());
        token
    }

    fn check_draft(draft: &PlaylistDraft) -> Result<()> {
        if draft.name.trim().is_empty() {
            return Err(ClientError::Validation("name is required".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn register(&self, creds: &Credentials) -> Result<String> {
        self.count();
        let mut st = self.state.lock().await;
        if creds.email.is_empty() || creds.password.is_empty() {
            return Err(ClientError::Auth("email and password are required".into()));
        }
        if st.accounts.contains_key(&creds.email) {
            return Err(ClientError::Auth("user already exists".into()));
        }
        st.accounts.insert(creds.email.clone(), creds.password.clone());
        info!("MockBackend: registered account");
        Ok(Self::issue_token(&mut st, &creds.email))
    }

    async fn login(&self, creds: &Credentials) -> Result<String> {
        self.count();
        let mut st = self.state.lock().await;
        let valid = st
            .accounts
            .get(&creds.email)
            .map(|pw| *pw == creds.password)
            .unwrap_or(false);
        if !valid {
            return Err(ClientError::Auth("invalid credentials".into()));
        }
        Ok(Self::issue_token(&mut st, &creds.email))
    }

    async fn list_playlists(&self, token: &str) -> Result<Vec<Playlist>> {
        self.count();
        let st = self.state.lock().await;
        let owner = Self::owner(&st, token)?;
        Ok(st.playlists.get(&owner).cloned().unwrap_or_default())
    }

    async fn create_playlist(&self, token: &str, draft: &PlaylistDraft) -> Result<Playlist> {
        self.count();
        let mut st = self.state.lock().await;
        let owner = Self::owner(&st, token)?;
        Self::check_draft(draft)?;
        let playlist = Playlist {
            id: Uuid::new_v4().simple().to_string(),
            name: draft.name.clone(),
            description: Some(draft.description.clone()),
            songs: Vec::new(),
        };
        st.playlists.entry(owner).or_default().push(playlist.clone());
        info!("MockBackend: create_playlist {}", playlist.id);
        Ok(playlist)
    }

    async fn update_playlist(&self, token: &str, id: &str, draft: &PlaylistDraft) -> Result<Playlist> {
        self.count();
        let mut st = self.state.lock().await;
        let owner = Self::owner(&st, token)?;
        Self::check_draft(draft)?;
        let playlist = st
            .playlists
            .get_mut(&owner)
            .and_then(|v| v.iter_mut().find(|p| p.id == id))
            .ok_or_else(|| ClientError::playlist_not_found(id))?;
        playlist.name = draft.name.clone();
        playlist.description = Some(draft.description.clone());
        Ok(playlist.clone())
    }

    async fn delete_playlist(&self, token: &str, id: &str) -> Result<()> {
        self.count();
        let mut st = self.state.lock().await;
        let owner = Self::owner(&st, token)?;
        let list = st.playlists.entry(owner).or_default();
        let before = list.len();
        list.retain(|p| p.id != id);
        if list.len() == before {
            return Err(ClientError::playlist_not_found(id));
        }
        Ok(())
    }

    async fn search_songs(&self, token: &str, query: &str) -> Result<Vec<Song>> {
        self.count();
        let st = self.state.lock().await;
        Self::owner(&st, token)?;
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .catalog
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&q)
                    || s.artist.to_lowercase().contains(&q)
                    || s.album.to_lowercase().contains(&q)
            })
            .cloned()
            .collect())
    }

    async fn add_song(&self, token: &str, playlist_id: &str, song: &Song) -> Result<()> {
        self.count();
        let mut st = self.state.lock().await;
        let owner = Self::owner(&st, token)?;
        let playlist = st
            .playlists
            .get_mut(&owner)
            .and_then(|v| v.iter_mut().find(|p| p.id == playlist_id))
            .ok_or_else(|| ClientError::playlist_not_found(playlist_id))?;
        playlist.songs.push(song.clone());
        info!("MockBackend: add_song {} -> {}", song.name, playlist_id);
        Ok(())
    }
}
