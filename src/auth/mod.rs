//! Session and credential collaborators
//!
//! The chat proxy client does not own authentication. Hosts hand it a
//! [`SessionSource`] that resolves the caller's current session token
//! (best-effort; guest callers have none) and an [`ApiKeyStore`] that knows
//! which providers have stored API keys. Both are trait seams so tests and
//! non-standard hosts can plug in their own implementations.

use std::error::Error;

/// Type-erased collaborator failure. The client only logs these.
pub type StoreError = Box<dyn Error + Send + Sync>;

/// Resolves the caller's current session token.
///
/// Absence of a token is not a failure: guests simply have none and requests
/// fall back to the proxy's anon key.
#[async_trait::async_trait]
pub trait SessionSource: Send + Sync {
    async fn access_token(&self) -> Option<String>;
}

/// Session source for hosts without authentication. Always yields `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSession;

#[async_trait::async_trait]
impl SessionSource for NoSession {
    async fn access_token(&self) -> Option<String> {
        None
    }
}

/// Fixed-token session source for tests and single-user hosts.
#[derive(Clone, Debug)]
pub struct StaticSession {
    token: String,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl SessionSource for StaticSession {
    async fn access_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// Storage holding per-provider API keys.
///
/// The client only ever asks which providers have keys; key material itself
/// never crosses this boundary.
#[async_trait::async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Provider names with at least one stored key. Duplicates are allowed;
    /// the client dedupes.
    async fn provider_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Key store with no backing storage. Always reports no providers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoKeyStore;

#[async_trait::async_trait]
impl ApiKeyStore for NoKeyStore {
    async fn provider_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }
}
