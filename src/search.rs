use crate::api::Backend;
use crate::error::Result;
use crate::models::Song;
use crate::session::Session;
use std::sync::Arc;
use tracing::debug;

/// Song search against the backend's catalog proxy.
///
/// Holds only the most recent result set. Results are not cached by query:
/// repeating a query goes back to the backend.
pub struct SongSearch {
    backend: Arc<dyn Backend>,
    results: Vec<Song>,
}

impl SongSearch {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            results: Vec::new(),
        }
    }

    /// Run a query and replace the held results with the response. Empty or
    /// blank queries are sent as-is. On failure the previous results stay.
    pub async fn search(&mut self, session: &Session, query: &str) -> Result<&[Song]> {
        let token = session.bearer()?;
        let tracks = self.backend.search_songs(token, query).await?;
        debug!("search {:?} returned {} tracks", query, tracks.len());
        self.results = tracks;
        Ok(&self.results)
    }

    pub fn results(&self) -> &[Song] {
        &self.results
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.results.get(index)
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}
