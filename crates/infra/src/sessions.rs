//! Bearer-token session tracking.
//!
//! Tokens are opaque UUIDs: they carry no claims, so revocation is a
//! plain map removal and a leaked token reveals nothing about the
//! account behind it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wardboard_core::{DomainError, UserId};

use crate::store::StoreError;

/// An opaque session token handed to the client after sign-in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionToken {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("SessionToken: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Maps live tokens to the account that owns them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint a fresh token for the given account.
    async fn open(&self, user: UserId) -> Result<SessionToken, StoreError>;
    /// Look up the account behind a token. `None` means signed out,
    /// expired, or never issued; the caller treats all three the same.
    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, StoreError>;
    /// Revoke a token. Revoking an unknown token is a no-op.
    async fn close(&self, token: &SessionToken) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, UserId>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn open(&self, user: UserId) -> Result<SessionToken, StoreError> {
        let token = SessionToken::generate();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| StoreError::Backend("session lock poisoned".to_string()))?;
        sessions.insert(token, user);
        Ok(token)
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, StoreError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| StoreError::Backend("session lock poisoned".to_string()))?;
        Ok(sessions.get(token).copied())
    }

    async fn close(&self, token: &SessionToken) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| StoreError::Backend("session lock poisoned".to_string()))?;
        sessions.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_resolve_close() {
        let store = InMemorySessionStore::new();
        let user = UserId::new();

        let token = store.open(user).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), Some(user));

        store.close(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);

        // closing twice is fine
        store.close(&token).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let store = InMemorySessionStore::new();
        let token = SessionToken::generate();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }

    #[test]
    fn token_roundtrips_through_string() {
        let token = SessionToken::generate();
        let parsed: SessionToken = token.to_string().parse().unwrap();
        assert_eq!(token, parsed);
    }
}
