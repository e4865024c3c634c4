//! Session Manager: owns the bearer token and its lifecycle.
use crate::api::Backend;
use crate::error::{ClientError, Result};
use crate::models::{AuthMode, Credentials};
use std::sync::Arc;
use tracing::{info, warn};

/// The authenticated context. Absent token means unauthenticated.
/// Only `SessionManager` mutates it; every other component borrows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Token for an outgoing call, or `Auth` without touching the network.
    pub fn bearer(&self) -> Result<&str> {
        self.current_token().ok_or_else(ClientError::auth_required)
    }

    fn clear(&mut self) {
        self.token = None;
    }
}

/// Result of a successful `authenticate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub mode: AuthMode,
    /// Only a login moves the caller on to the dashboard; a registration
    /// leaves it on the auth screen so the user logs in next.
    pub advance_to_dashboard: bool,
    /// Set when the playlist refresh following authentication failed.
    /// The session itself is established regardless.
    pub refresh_error: Option<ClientError>,
}

pub struct SessionManager {
    backend: Arc<dyn Backend>,
    session: Session,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_token(&self) -> Option<&str> {
        self.session.current_token()
    }

    /// Log in or register. The token is stored only after the backend
    /// returned a non-empty one; no retry is attempted.
    pub async fn authenticate(&mut self, email: &str, password: &str, mode: AuthMode) -> Result<AuthOutcome> {
        let creds = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.backend.authenticate(&creds, mode).await;
        let token = self.observe(result)?;
        self.session.token = Some(token);
        info!("{} succeeded via {}", mode.endpoint(), self.backend.name());
        Ok(AuthOutcome {
            mode,
            advance_to_dashboard: mode == AuthMode::Login,
            refresh_error: None,
        })
    }

    pub fn clear(&mut self) {
        if self.session.is_authenticated() {
            info!("session cleared");
        }
        self.session.clear();
    }

    /// Pass a result through, dropping the token if the backend rejected it.
    pub fn observe<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_auth() && self.session.is_authenticated() {
                warn!("backend rejected credentials, clearing session: {}", e);
                self.session.clear();
            }
        }
        result
    }
}
