//! Observable session state backed by the token store.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::{TokenPair, User};
use crate::store::{StoreError, StoreKey, TokenStore};

/// What observers see: the user and the authenticated flag always move together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub current_user: Option<User>,
    pub is_authenticated: bool,
}

/// Holds the current user and authentication flag, persisting the session
/// through a [`TokenStore`] and pushing every transition to subscribers.
pub struct SessionState {
    store: Arc<dyn TokenStore>,
    /// Serializes writes of the three store keys with their publication.
    write_lock: Mutex<()>,
    sender: watch::Sender<SessionSnapshot>,
}

impl SessionState {
    /// Restores the session from the store.
    ///
    /// An access token plus a cached user is enough to start authenticated;
    /// expiry is left to whoever consumes the token.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let initial = restore_snapshot(store.as_ref());
        if initial.is_authenticated {
            info!("Restored persisted session from '{}' store", store.get_name());
        }
        let (sender, _) = watch::channel(initial);
        SessionState {
            store,
            write_lock: Mutex::new(()),
            sender,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.sender.borrow().current_user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_authenticated
    }

    /// Receives every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }

    pub fn access_token(&self) -> Option<String> {
        read_entry(self.store.as_ref(), StoreKey::AccessToken)
    }

    pub fn refresh_token(&self) -> Option<String> {
        read_entry(self.store.as_ref(), StoreKey::RefreshToken)
    }

    /// The user persisted in the store, which may differ from the published
    /// one only while a write is in flight.
    pub fn stored_user(&self) -> Option<User> {
        read_user(self.store.as_ref())
    }

    /// Persists a fresh token pair and user, then publishes them.
    ///
    /// Nothing is published if the store rejects the write.
    pub fn set_auth_data(&self, tokens: &TokenPair, user: &User) -> Result<(), StoreError> {
        let serialized_user = serde_json::to_string(user)?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.store.set_all(&[
            (StoreKey::AccessToken, tokens.access_token.clone()),
            (StoreKey::RefreshToken, tokens.refresh_token.clone()),
            (StoreKey::CurrentUser, serialized_user),
        ])?;
        self.sender.send_replace(SessionSnapshot {
            current_user: Some(user.clone()),
            is_authenticated: true,
        });

        info!("Session authenticated for user '{}'", user.username);
        Ok(())
    }

    /// Removes all session entries and publishes the signed-out snapshot.
    ///
    /// Observers are notified even when the store fails to delete; the error
    /// is still returned.
    pub fn clear_auth_data(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let result = self.store.remove_all(&StoreKey::ALL);
        self.sender.send_replace(SessionSnapshot::default());

        info!("Session cleared");
        result
    }
}

fn read_entry(store: &dyn TokenStore, key: StoreKey) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!("Failed to read '{}' from session store: {}", key.as_str(), e);
            None
        }
    }
}

fn read_user(store: &dyn TokenStore) -> Option<User> {
    let raw = read_entry(store, StoreKey::CurrentUser)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Ignoring unreadable cached user: {}", e);
            None
        }
    }
}

fn restore_snapshot(store: &dyn TokenStore) -> SessionSnapshot {
    let token = read_entry(store, StoreKey::AccessToken);
    let user = read_user(store);
    match (token, user) {
        (Some(_), Some(user)) => SessionSnapshot {
            current_user: Some(user),
            is_authenticated: true,
        },
        _ => {
            debug!("No persisted session found");
            SessionSnapshot::default()
        }
    }
}
