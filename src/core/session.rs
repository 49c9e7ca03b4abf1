//! Session storage: auth token, tenant and cross-screen signals
//!
//! Stands in for browser local storage. The REST client reads the bearer
//! token and tenant from here on every request; screens use
//! [`SessionSignals`] to pass one-shot flags to each other without a server
//! round trip.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";
/// Key holding the active tenant id
pub const TENANT_KEY: &str = "tenantId";
/// Flag set after an invitation was accepted
pub const INVITATION_SUCCESS_KEY: &str = "invitationSuccess";
/// Email to prefill on the login screen
pub const PENDING_LOGIN_EMAIL_KEY: &str = "pendingLoginEmail";

/// String key/value storage shared across screens
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str) -> Option<String>;
}

/// In-memory session store
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a bearer token
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(TOKEN_KEY, token);
        store
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

/// Typed helpers over a [`SessionStore`] for the cross-screen signals.
///
/// `take_*` methods read and clear, so a signal is consumed once.
#[derive(Clone)]
pub struct SessionSignals {
    store: Arc<dyn SessionStore>,
}

impl SessionSignals {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn clear_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    pub fn set_tenant(&self, tenant_id: &str) {
        self.store.set(TENANT_KEY, tenant_id);
    }

    pub fn mark_invitation_success(&self) {
        self.store.set(INVITATION_SUCCESS_KEY, "true");
    }

    pub fn take_invitation_success(&self) -> bool {
        self.store
            .remove(INVITATION_SUCCESS_KEY)
            .is_some_and(|v| v == "true")
    }

    pub fn set_pending_login_email(&self, email: &str) {
        self.store.set(PENDING_LOGIN_EMAIL_KEY, email);
    }

    pub fn take_pending_login_email(&self) -> Option<String> {
        self.store
            .remove(PENDING_LOGIN_EMAIL_KEY)
            .filter(|e| !e.is_empty())
    }
}
