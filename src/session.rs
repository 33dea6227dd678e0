//! Session state for authenticated API access
//!
//! The [`SessionStore`] is the single holder of the current bearer token and
//! user identity. It is populated on successful login or registration, read
//! on every outbound request, and cleared on logout or when a protected
//! endpoint reports the session as expired.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Identity of the authenticated user as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An established authentication session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token attached to protected requests
    pub token: String,
    pub user: User,
    /// When the session was established on this client
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
            established_at: Utc::now(),
        }
    }
}

/// Persistence port for sessions
///
/// The default store keeps the session in memory only. Attaching a backend
/// lets an application survive restarts (e.g. a keyring or a config file)
/// without the store itself knowing where the bytes go.
pub trait SessionBackend: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

/// Process-wide holder of at most one active [`Session`]
///
/// Cloning the store is cheap and every clone observes the same session.
/// Mutation discipline is single-writer-at-a-time: the controller layer
/// issues at most one auth operation at once.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
    backend: Option<Arc<dyn SessionBackend>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an in-memory store with no active session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            backend: None,
        }
    }

    /// Create a store backed by a persistence port
    ///
    /// Any session the backend already holds becomes the active session.
    pub fn with_backend(backend: Arc<dyn SessionBackend>) -> Self {
        let initial = backend.load();
        Self {
            inner: Arc::new(RwLock::new(initial)),
            backend: Some(backend),
        }
    }

    /// Install a new session, replacing any previous one
    pub fn set(&self, session: Session) {
        if let Some(backend) = &self.backend {
            backend.save(&session);
        }
        *self.inner.write().unwrap() = Some(session);
    }

    /// Current session, if any
    pub fn get(&self) -> Option<Session> {
        self.inner.read().unwrap().clone()
    }

    /// Current bearer token, if a session exists
    pub fn token(&self) -> Option<String> {
        self.inner.read().unwrap().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().is_some()
    }

    /// Drop the active session
    pub fn clear(&self) {
        if let Some(backend) = &self.backend {
            backend.clear();
        }
        *self.inner.write().unwrap() = None;
    }
}
