//! Session-scoped credential storage and the gate in front of protected routes.
//!
//! The credential lives in [`SessionStorage`] under a fixed key for the life of
//! the process. Only [`SessionGate`] reads or writes that key: it is set after a
//! successful login and cleared on logout. Presence of a non-empty token is the
//! whole of "authenticated"; there is no expiry or refresh.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::config::ClientConfig;
use crate::route::Route;

/// Key/value storage that lives as long as the session (the process)
#[derive(Debug, Default)]
pub struct SessionStorage {
    items: RwLock<HashMap<String, String>>,
}

static GLOBAL_STORAGE: Lazy<Arc<SessionStorage>> = Lazy::new(|| Arc::new(SessionStorage::default()));

impl SessionStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Process-wide instance
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_STORAGE)
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    pub fn remove_item(&self, key: &str) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Opaque bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// `None` for an empty token, which never counts as a session
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Outcome of checking a route against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Permit,
    /// Go to `to`; `from` is the location originally asked for
    Redirect { to: Route, from: Route },
}

#[derive(Debug, Clone)]
pub struct SessionGate {
    storage: Arc<SessionStorage>,
    key: String,
}

impl SessionGate {
    pub fn new(storage: Arc<SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Gate over the process-wide storage, keyed per config
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(SessionStorage::global(), config.session.token_key.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn credential(&self) -> Option<Credential> {
        self.storage.get_item(&self.key).and_then(Credential::new)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Decide whether `requested` may render
    pub fn require_session(&self, requested: Route) -> GateDecision {
        if !requested.is_protected() || self.is_authenticated() {
            GateDecision::Permit
        } else {
            tracing::debug!("no session for {}, redirecting to {}", requested, Route::Login);
            GateDecision::Redirect {
                to: Route::Login,
                from: requested,
            }
        }
    }

    /// Record the credential from a successful login
    pub fn store(&self, credential: &Credential) {
        self.storage.set_item(&self.key, credential.as_str());
    }

    /// Logout: drop the credential
    pub fn clear(&self) {
        self.storage.remove_item(&self.key);
    }
}
