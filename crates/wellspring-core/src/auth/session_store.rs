//! Where a signed-in session survives between runs.

use std::sync::{Arc, Mutex};

use super::traits::AuthSession;
use crate::error::AuthError;

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<AuthSession>, AuthError>;
    fn save(&self, session: &AuthSession) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// Thin wrapper around the OS keyring, storing the session as JSON.
pub struct KeyringSessionStore {
    service: String,
    key: String,
}

impl KeyringSessionStore {
    const SERVICE: &'static str = "wellspring";

    pub fn new(key: impl Into<String>) -> Self {
        Self {
            service: Self::SERVICE.to_string(),
            key: key.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, AuthError> {
        Ok(keyring::Entry::new(&self.service, &self.key)?)
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<AuthSession>, AuthError> {
        match self.entry()?.get_password() {
            Ok(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AuthError::SessionStore(e.to_string())),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        let json =
            serde_json::to_string(session).map_err(|e| AuthError::SessionStore(e.to_string()))?;
        self.entry()?.set_password(&json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<AuthSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: AuthSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<AuthSession>, AuthError> {
        self.slot
            .lock()
            .map(|s| s.clone())
            .map_err(|e| AuthError::SessionStore(e.to_string()))
    }

    fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| AuthError::SessionStore(e.to_string()))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| AuthError::SessionStore(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
        let session = AuthSession {
            access_token: "tok".into(),
            refresh_token: Some("ref".into()),
            expires_at: None,
            user: User {
                id: "1".into(),
                email: "a@b.c".into(),
                full_name: None,
            },
        };
        store.save(&session).unwrap();
        assert_eq!(store.clone().load().unwrap(), Some(session));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
