//! Process-wide holder of the current access token.
//!
//! The token lives in memory and is mirrored to a [`KeyValueStore`] so a reload can
//! rehydrate it. Writers are the login/register, refresh and logout paths; every
//! outgoing request reads it. Everything runs on the single UI thread, so the store
//! is shared through `Rc` and never locked.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::{TOKEN_KEY, USER_KEY};
use crate::models::User;

/// Durable string storage, `localStorage` in the browser.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and non-browser hosts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

struct SessionInner {
    token: RefCell<Option<String>>,
    storage: Box<dyn KeyValueStore>,
}

/// Cheap-to-clone handle; all clones see the same token.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                token: RefCell::new(None),
                storage: Box::new(storage),
            }),
        }
    }

    /// Current token, falling back to the persisted copy after a reload.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        if let Some(token) = self.inner.token.borrow().as_ref() {
            return Some(token.clone());
        }
        self.inner.storage.get(TOKEN_KEY)
    }

    /// Replaces the token; requests issued afterwards carry the new value.
    pub fn set_token(&self, token: &str) {
        debug!("access token replaced");
        *self.inner.token.borrow_mut() = Some(token.to_string());
        self.inner.storage.set(TOKEN_KEY, token);
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.inner.storage.set(USER_KEY, &json),
            Err(e) => warn!("failed to persist user snapshot: {e}"),
        }
    }

    /// Snapshot written by [`Self::persist_user`]; a corrupt entry reads as absent.
    #[must_use]
    pub fn persisted_user(&self) -> Option<User> {
        let raw = self.inner.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("discarding unreadable user snapshot: {e}");
                None
            }
        }
    }

    /// Drops the token and user snapshot from memory and storage.
    pub fn clear(&self) {
        debug!("session cleared");
        *self.inner.token.borrow_mut() = None;
        self.inner.storage.remove(TOKEN_KEY);
        self.inner.storage.remove(USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, UserId};

    fn ada() -> User {
        User {
            id: UserId::from("u1"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_set_token_mirrors_to_storage() {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());

        session.set_token("abc");
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));

        session.set_token("def");
        assert_eq!(session.token().as_deref(), Some("def"));
    }

    #[test]
    fn test_token_rehydrates_from_storage() {
        let storage = MemoryStore::new();
        storage.set(TOKEN_KEY, "persisted");

        let session = SessionStore::new(storage);
        assert_eq!(session.token().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_clones_share_state() {
        let session = SessionStore::new(MemoryStore::new());
        let other = session.clone();
        other.set_token("shared");
        assert_eq!(session.token().as_deref(), Some("shared"));
    }

    #[test]
    fn test_clear_removes_everything() {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());
        session.set_token("abc");
        session.persist_user(&ada());

        session.clear();
        assert!(!session.has_token());
        assert_eq!(session.persisted_user(), None);
        assert_eq!(storage.get(USER_KEY), None);
    }

    #[test]
    fn test_user_snapshot_round_trip() {
        let session = SessionStore::new(MemoryStore::new());
        session.persist_user(&ada());
        assert_eq!(session.persisted_user(), Some(ada()));
    }

    #[test]
    fn test_corrupt_snapshot_reads_as_absent() {
        let storage = MemoryStore::new();
        storage.set(USER_KEY, "{not json");
        let session = SessionStore::new(storage);
        assert_eq!(session.persisted_user(), None);
    }
}
