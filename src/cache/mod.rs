//! # Cache Module
//! Token cache stores and the adapter the client reads and writes them through.
//!
//! Entries are plain JSON objects. All refresh tokens in one cache are assumed to belong to
//! the same user; entries of different accounts are neither merged nor told apart on read.

mod adapter;
mod in_memory;
mod persistent;

use std::fmt::Debug;

use serde_json::{Map, Value};

use crate::types::OidcReturnType;

pub use adapter::TokenCacheAdapter;
pub use in_memory::InMemoryTokenCache;
pub use persistent::{load_persistent_cache, PersistentTokenCache};

/// A cached credential
pub type CacheEntry = Map<String, Value>;

/// Kind of cached credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialType {
    /// Access token entries
    AccessToken,
    /// Refresh token entries
    RefreshToken,
}

/// # CacheEvent
/// A successful token response to be written to a cache
#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// Client the tokens were issued to
    pub client_id: String,
    /// Decoded response body
    pub response: Map<String, Value>,
    /// Scopes that were requested
    pub scope: Vec<String>,
    /// Token endpoint the request was sent to
    pub token_endpoint: String,
    /// Refresh token the request redeemed. Entries still holding it are kept as they are.
    pub refresh_token: Option<String>,
}

/// # TokenCache
/// A keyed token store.
///
/// Each call is atomic on its own. Nothing spans a search followed by a mutation, so callers
/// that need such a sequence to be consistent must serialize access themselves.
pub trait TokenCache: Debug + Send + Sync {
    /// Entries of `credential_type` matching every `query` field whose `target` contains all
    /// the scopes of `target`
    fn search(
        &self,
        credential_type: CredentialType,
        target: Option<&[String]>,
        query: &[(&str, &str)],
    ) -> Vec<CacheEntry>;

    /// Stores the tokens of a successful response. `now` is the time the request was sent
    fn add(&self, event: CacheEvent, now: i64) -> OidcReturnType<()>;

    /// Removes a refresh token entry previously returned by [TokenCache::search]
    fn remove_rt(&self, entry: &CacheEntry) -> OidcReturnType<()>;

    /// Replaces the secret of a refresh token entry previously returned by [TokenCache::search]
    fn update_rt(&self, entry: &CacheEntry, new_secret: &str) -> OidcReturnType<()>;

    /// Serializes the cache content to JSON
    fn serialize(&self) -> OidcReturnType<String>;
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod cache_tests;
