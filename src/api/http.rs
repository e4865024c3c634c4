use super::Backend;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{Credentials, Playlist, PlaylistDraft, SearchResponse, Song, TokenResponse};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// What a request refers to; decides how 4xx statuses are classified.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Credentials,
    Collection,
    Playlist(&'a str),
}

/// Backend reached over HTTP. Every request is bounded by the configured
/// timeout; a timeout surfaces as `ClientError::Network`.
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ClientError::Validation(format!("invalid base url {}: {}", base_url, e)))?;
        // join() drops the last path segment unless the base ends with '/'
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("building http client: {}", e)))?;
        Ok(Self { client, base })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.api_base(), cfg.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Validation(format!("invalid endpoint {}: {}", path, e)))
    }

    fn playlist_url(&self, id: &str, suffix: &str) -> Result<Url> {
        self.endpoint(&format!("api/playlists/{}{}", urlencoding::encode(id), suffix))
    }

    fn authorized(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json")
    }

    async fn send(&self, req: RequestBuilder, target: Target<'_>) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!("{} {} -> {}", self.name(), resp.url().path(), status);
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(classify(status, &body, target))
    }

    async fn auth_call(&self, endpoint: &str, creds: &Credentials) -> Result<String> {
        let url = self.endpoint(endpoint)?;
        let resp = self
            .send(self.client.post(url).json(creds), Target::Credentials)
            .await?;
        let tr: TokenResponse = resp.json().await?;
        match tr.token {
            Some(t) if !t.is_empty() => Ok(t),
            _ => Err(ClientError::Auth("backend issued no token".into())),
        }
    }
}

/// Map a non-2xx status to the error taxonomy.
fn classify(status: StatusCode, body: &str, target: Target<'_>) -> ClientError {
    let msg = backend_message(body).unwrap_or_else(|| status.to_string());
    match (status.as_u16(), target) {
        (401 | 403, _) => ClientError::Auth(msg),
        (400 | 409 | 422, Target::Credentials) => ClientError::Auth(msg),
        (404, Target::Playlist(id)) => ClientError::playlist_not_found(id),
        (400 | 409 | 422, _) => ClientError::Validation(msg),
        // includes 404 on login or a collection route: a wrong base url
        _ => ClientError::Network(format!("unexpected status {}: {}", status, msg)),
    }
}

/// Prefer the backend's `message`/`error` field, fall back to the raw text.
fn backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(j) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(m) = j["message"].as_str().or_else(|| j["error"].as_str()) {
            return Some(m.to_string());
        }
    }
    Some(trimmed.chars().take(200).collect())
}

#[async_trait]
impl Backend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn register(&self, creds: &Credentials) -> Result<String> {
        self.auth_call("api/register", creds).await
    }

    async fn login(&self, creds: &Credentials) -> Result<String> {
        self.auth_call("api/login", creds).await
    }

    async fn list_playlists(&self, token: &str) -> Result<Vec<Playlist>> {
        let url = self.endpoint("api/playlists")?;
        let req = self.authorized(self.client.get(url), token);
        let resp = self.send(req, Target::Collection).await?;
        Ok(resp.json().await?)
    }

    async fn create_playlist(&self, token: &str, draft: &PlaylistDraft) -> Result<Playlist> {
        let url = self.endpoint("api/playlists")?;
        let req = self.authorized(self.client.post(url), token).json(draft);
        let resp = self.send(req, Target::Collection).await?;
        Ok(resp.json().await?)
    }

    async fn update_playlist(&self, token: &str, id: &str, draft: &PlaylistDraft) -> Result<Playlist> {
        let url = self.playlist_url(id, "")?;
        let req = self.authorized(self.client.put(url), token).json(draft);
        let resp = self.send(req, Target::Playlist(id)).await?;
        Ok(resp.json().await?)
    }

    async fn delete_playlist(&self, token: &str, id: &str) -> Result<()> {
        let url = self.playlist_url(id, "")?;
        let req = self.authorized(self.client.delete(url), token);
        self.send(req, Target::Playlist(id)).await?;
        Ok(())
    }

    async fn search_songs(&self, token: &str, query: &str) -> Result<Vec<Song>> {
        let mut url = self.endpoint("api/spotify/search")?;
        url.query_pairs_mut().append_pair("q", query);
        let req = self.authorized(self.client.get(url), token);
        let resp = self.send(req, Target::Collection).await?;
        let sr: SearchResponse = resp.json().await?;
        Ok(sr.tracks)
    }

    async fn add_song(&self, token: &str, playlist_id: &str, song: &Song) -> Result<()> {
        let url = self.playlist_url(playlist_id, "/songs")?;
        let req = self.authorized(self.client.post(url), token).json(song);
        self.send(req, Target::Playlist(playlist_id)).await?;
        Ok(())
    }
}
