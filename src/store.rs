//! Playlist Store: the local copy of the user's playlists and the edit buffer.
//!
//! Every successful mutation is followed by a full `refresh`; the local
//! collection is never patched in place.
use crate::api::Backend;
use crate::error::Result;
use crate::models::{Playlist, PlaylistDraft, Song};
use crate::session::Session;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(String),
}

/// In-progress create/update. At most one exists; starting another
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditBuffer {
    #[default]
    Idle,
    Editing {
        target: EditTarget,
        name: String,
        description: String,
    },
}

impl EditBuffer {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditBuffer::Editing { .. })
    }

    /// Id of the playlist being edited, if the buffer targets one.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            EditBuffer::Editing { target: EditTarget::Existing(id), .. } => Some(id),
            _ => None,
        }
    }
}

pub struct PlaylistStore {
    backend: Arc<dyn Backend>,
    playlists: Vec<Playlist>,
    edit: EditBuffer,
}

impl PlaylistStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            playlists: Vec::new(),
            edit: EditBuffer::Idle,
        }
    }

    /// Collection as of the last successful refresh, in backend order.
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn find(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn edit_buffer(&self) -> &EditBuffer {
        &self.edit
    }

    /// Drop all local state (used on logout).
    pub fn reset(&mut self) {
        self.playlists.clear();
        self.edit = EditBuffer::Idle;
    }

    /// Fetch the whole collection and replace the local copy with it.
    pub async fn refresh(&mut self, session: &Session) -> Result<&[Playlist]> {
        let token = session.bearer()?;
        let fetched = self.backend.list_playlists(token).await?;
        debug!("refreshed {} playlists", fetched.len());
        self.playlists = fetched;
        Ok(&self.playlists)
    }

    async fn refresh_after(&mut self, session: &Session, op: &str) -> Result<()> {
        if let Err(e) = self.refresh(session).await {
            warn!("{} was applied but the follow-up refresh failed: {}", op, e);
            return Err(e);
        }
        Ok(())
    }

    pub async fn create(&mut self, session: &Session, name: &str, description: &str) -> Result<Playlist> {
        let token = session.bearer()?;
        let draft = PlaylistDraft {
            name: name.to_string(),
            description: description.to_string(),
        };
        let created = self.backend.create_playlist(token, &draft).await?;
        info!("created playlist {}", created.id);
        self.edit = EditBuffer::Idle;
        self.refresh_after(session, "create").await?;
        Ok(created)
    }

    pub async fn update(&mut self, session: &Session, id: &str, name: &str, description: &str) -> Result<Playlist> {
        let token = session.bearer()?;
        let draft = PlaylistDraft {
            name: name.to_string(),
            description: description.to_string(),
        };
        let updated = self.backend.update_playlist(token, id, &draft).await?;
        info!("updated playlist {}", id);
        self.edit = EditBuffer::Idle;
        self.refresh_after(session, "update").await?;
        Ok(updated)
    }

    /// Deleting an id the backend no longer knows is a `NotFound` error.
    pub async fn delete(&mut self, session: &Session, id: &str) -> Result<()> {
        let token = session.bearer()?;
        self.backend.delete_playlist(token, id).await?;
        info!("deleted playlist {}", id);
        if self.edit.target_id() == Some(id) {
            self.edit = EditBuffer::Idle;
        }
        self.refresh_after(session, "delete").await
    }

    /// Append order is the backend's; the refreshed collection is authoritative.
    pub async fn add_song(&mut self, session: &Session, playlist_id: &str, song: &Song) -> Result<()> {
        let token = session.bearer()?;
        self.backend.add_song(token, playlist_id, song).await?;
        info!("added song to playlist {}", playlist_id);
        self.refresh_after(session, "add song").await
    }

    pub fn begin_create(&mut self) {
        self.edit = EditBuffer::Editing {
            target: EditTarget::New,
            name: String::new(),
            description: String::new(),
        };
    }

    /// Load a playlist into the edit buffer, replacing whatever was there.
    pub fn begin_edit(&mut self, playlist: &Playlist) {
        self.edit = EditBuffer::Editing {
            target: EditTarget::Existing(playlist.id.clone()),
            name: playlist.name.clone(),
            description: playlist.description.clone().unwrap_or_default(),
        };
    }

    pub fn set_name(&mut self, value: &str) {
        self.ensure_editing();
        if let EditBuffer::Editing { name, .. } = &mut self.edit {
            *name = value.to_string();
        }
    }

    pub fn set_description(&mut self, value: &str) {
        self.ensure_editing();
        if let EditBuffer::Editing { description, .. } = &mut self.edit {
            *description = value.to_string();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditBuffer::Idle;
    }

    // typing into an idle form starts a new playlist
    fn ensure_editing(&mut self) {
        if !self.edit.is_editing() {
            self.begin_create();
        }
    }

    /// Submit the edit buffer: create for a new target, update otherwise.
    /// An idle buffer submits an empty draft, which the backend rejects.
    pub async fn save_edit(&mut self, session: &Session) -> Result<Playlist> {
        let (target, name, description) = match &self.edit {
            EditBuffer::Editing { target, name, description } => (target.clone(), name.clone(), description.clone()),
            EditBuffer::Idle => (EditTarget::New, String::new(), String::new()),
        };
        match target {
            EditTarget::New => self.create(session, &name, &description).await,
            EditTarget::Existing(id) => self.update(session, &id, &name, &description).await,
        }
    }
}
