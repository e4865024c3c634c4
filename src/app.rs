//! Facade composing the session, store, search and linker for a front end.
//!
//! It holds the active view and applies the cross-component rules: refresh
//! after authentication, gate dashboard/search on a token, and drop all
//! local state when the backend rejects the token.
use crate::api::Backend;
use crate::error::{ClientError, Result};
use crate::linker::{AttachTarget, Attached, PlaylistSongLinker};
use crate::models::{AuthMode, Playlist, Song};
use crate::search::SongSearch;
use crate::session::{AuthOutcome, Session, SessionManager};
use crate::store::PlaylistStore;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Dashboard,
    Search,
}

pub struct PlaylistApp {
    sessions: SessionManager,
    store: PlaylistStore,
    search: SongSearch,
    view: View,
}

impl PlaylistApp {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            sessions: SessionManager::new(backend.clone()),
            store: PlaylistStore::new(backend.clone()),
            search: SongSearch::new(backend),
            view: View::Auth,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    pub fn store(&self) -> &PlaylistStore {
        &self.store
    }

    /// Direct access for edit-buffer transitions.
    pub fn store_mut(&mut self) -> &mut PlaylistStore {
        &mut self.store
    }

    pub fn search_results(&self) -> &[Song] {
        self.search.results()
    }

    pub async fn authenticate(&mut self, email: &str, password: &str, mode: AuthMode) -> Result<AuthOutcome> {
        let res = self.sessions.authenticate(email, password, mode).await;
        let mut outcome = self.guard(res)?;
        if outcome.advance_to_dashboard {
            self.view = View::Dashboard;
        }
        // authentication already succeeded; only a rejected token undoes it
        if let Err(e) = self.refresh().await {
            if e.is_auth() {
                return Err(e);
            }
            warn!("authenticated but initial refresh failed: {}", e);
            outcome.refresh_error = Some(e);
        }
        Ok(outcome)
    }

    pub fn logout(&mut self) {
        self.sessions.clear();
        self.reset_local();
    }

    pub fn select_view(&mut self, view: View) -> Result<()> {
        if view != View::Auth && !self.session().is_authenticated() {
            return Err(ClientError::auth_required());
        }
        self.view = view;
        Ok(())
    }

    /// Switch to the dashboard and reload the collection.
    pub async fn open_dashboard(&mut self) -> Result<&[Playlist]> {
        self.select_view(View::Dashboard)?;
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<&[Playlist]> {
        let res = self.store.refresh(self.sessions.session()).await.map(|_| ());
        self.guard(res)?;
        Ok(self.store.playlists())
    }

    pub async fn save_edit(&mut self) -> Result<Playlist> {
        let res = self.store.save_edit(self.sessions.session()).await;
        self.guard(res)
    }

    pub async fn delete_playlist(&mut self, id: &str) -> Result<()> {
        let res = self.store.delete(self.sessions.session(), id).await;
        self.guard(res)
    }

    pub async fn search(&mut self, query: &str) -> Result<&[Song]> {
        let res = self.search.search(self.sessions.session(), query).await.map(|_| ());
        self.guard(res)?;
        Ok(self.search.results())
    }

    pub fn attach_targets(&self) -> Vec<AttachTarget> {
        PlaylistSongLinker::targets_of(&self.store)
    }

    pub async fn attach(&mut self, playlist_id: &str, song: &Song) -> Result<Attached> {
        let session = self.sessions.session();
        let res = PlaylistSongLinker::new(&mut self.store)
            .attach(session, playlist_id, song)
            .await;
        self.guard(res)
    }

    /// Attach the search result at `index` from the current result set.
    pub async fn attach_result(&mut self, index: usize, playlist_id: &str) -> Result<Attached> {
        let song = self
            .search
            .get(index)
            .cloned()
            .ok_or_else(|| ClientError::Validation(format!("no search result at index {}", index)))?;
        self.attach(playlist_id, &song).await
    }

    fn guard<T>(&mut self, res: Result<T>) -> Result<T> {
        let res = self.sessions.observe(res);
        if !self.sessions.session().is_authenticated() {
            self.reset_local();
        }
        res
    }

    fn reset_local(&mut self) {
        self.store.reset();
        self.search.clear();
        self.view = View::Auth;
    }
}
