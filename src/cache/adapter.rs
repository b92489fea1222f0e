use std::sync::Arc;

use tracing::debug;

use crate::{
    helpers::{get_int, get_str},
    types::{AccessTokenInfo, OidcReturnType},
};

use super::{CacheEntry, CacheEvent, CredentialType, TokenCache};

/// # TokenCacheAdapter
/// The reads and writes the client performs on a [TokenCache]
#[derive(Debug, Clone)]
pub struct TokenCacheAdapter {
    cache: Arc<dyn TokenCache>,
}

impl TokenCacheAdapter {
    /// Wraps `cache`
    pub fn new(cache: Arc<dyn TokenCache>) -> Self {
        Self { cache }
    }

    /// The wrapped cache
    pub fn cache(&self) -> &Arc<dyn TokenCache> {
        &self.cache
    }

    /// First cached access token for `scopes`, `client_id` and `tenant` that expires after
    /// `now`. Expired entries are skipped, not evicted.
    pub fn find_valid_access_token(
        &self,
        scopes: &[String],
        client_id: &str,
        tenant: &str,
        now: i64,
    ) -> Option<AccessTokenInfo> {
        let entries = self.cache.search(
            CredentialType::AccessToken,
            Some(scopes),
            &[("client_id", client_id), ("realm", tenant)],
        );

        for entry in entries {
            let (Some(secret), Some(expires_on)) =
                (get_str(&entry, "secret"), get_int(&entry, "expires_on"))
            else {
                continue;
            };

            if expires_on > now {
                debug!(client_id, tenant, expires_on, "found a valid cached access token");
                return Some(AccessTokenInfo::new(
                    secret,
                    expires_on,
                    get_str(&entry, "token_type").map(str::to_string),
                    get_int(&entry, "refresh_on"),
                ));
            }
        }

        debug!(client_id, tenant, "no valid cached access token");
        None
    }

    /// Every cached refresh token for `scopes`, whatever client, tenant or account it belongs to
    pub fn list_refresh_tokens(&self, scopes: &[String]) -> Vec<CacheEntry> {
        self.cache
            .search(CredentialType::RefreshToken, Some(scopes), &[])
    }

    /// Refresh token entries whose secret is `secret`
    pub fn find_refresh_tokens_by_secret(&self, secret: &str) -> Vec<CacheEntry> {
        self.cache
            .search(CredentialType::RefreshToken, None, &[("secret", secret)])
    }

    /// Removes a refresh token entry
    pub fn evict_refresh_token(&self, entry: &CacheEntry) -> OidcReturnType<()> {
        self.cache.remove_rt(entry)
    }

    /// Replaces the secret of a refresh token entry
    pub fn update_refresh_token(&self, entry: &CacheEntry, new_secret: &str) -> OidcReturnType<()> {
        self.cache.update_rt(entry, new_secret)
    }

    /// Stores a token response sent at `timestamp`
    pub fn add(&self, event: CacheEvent, timestamp: i64) -> OidcReturnType<()> {
        self.cache.add(event, timestamp)
    }
}
