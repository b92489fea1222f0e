use std::{env, sync::Arc};

use crate::cache::TokenCache;

use super::CachePersistenceOptions;

/// Environment variable overriding the default authority host
pub const AUTHORITY_HOST_ENV: &str = "AZURE_AUTHORITY_HOST";
/// Environment variable that, when set, pins every request to the configured tenant
pub const DISABLE_MULTITENANT_AUTH_ENV: &str = "AZURE_IDENTITY_DISABLE_MULTITENANTAUTH";

/// # ClientCoreOptions
/// Construction options of [crate::client::ClientCore]
#[derive(Debug, Default, Clone)]
pub struct ClientCoreOptions {
    /// Authority host, e.g. `login.microsoftonline.com`.
    /// Defaults to `https://login.microsoftonline.com`
    pub authority: Option<String>,
    /// Tenants, besides the configured one, a request may ask for. `*` allows any tenant
    pub additionally_allowed_tenants: Vec<String>,
    /// Token cache supplied by the caller. It is borrowed, not owned, by the client
    pub cache: Option<Arc<dyn TokenCache>>,
    /// CAE token cache supplied by the caller
    pub cae_cache: Option<Arc<dyn TokenCache>>,
    /// When set, caches created by the client are persisted to disk
    pub cache_persistence_options: Option<CachePersistenceOptions>,
    /// Ignore per request tenant overrides
    pub disable_multitenant_auth: bool,
}

impl ClientCoreOptions {
    /// Options read from the process environment:
    ///
    /// - `AZURE_AUTHORITY_HOST` sets `authority`
    /// - `AZURE_IDENTITY_DISABLE_MULTITENANTAUTH` (any non empty value) sets `disable_multitenant_auth`
    pub fn from_env() -> Self {
        Self {
            authority: env::var(AUTHORITY_HOST_ENV).ok().filter(|a| !a.is_empty()),
            disable_multitenant_auth: env::var(DISABLE_MULTITENANT_AUTH_ENV)
                .is_ok_and(|v| !v.is_empty()),
            ..Default::default()
        }
    }

    /// Sets the authority
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Sets the additionally allowed tenants
    pub fn additionally_allowed_tenants(mut self, tenants: Vec<String>) -> Self {
        self.additionally_allowed_tenants = tenants;
        self
    }

    /// Sets a caller owned cache
    pub fn cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets a caller owned CAE cache
    pub fn cae_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.cae_cache = Some(cache);
        self
    }

    /// Sets the persistence options for client created caches
    pub fn cache_persistence_options(mut self, options: CachePersistenceOptions) -> Self {
        self.cache_persistence_options = Some(options);
        self
    }
}
