use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    cache::{load_persistent_cache, CacheEntry, InMemoryTokenCache, TokenCache, TokenCacheAdapter},
    helpers::now,
    types::{
        AccessTokenInfo, CachePersistenceOptions, ClientCoreOptions, OidcClientError,
        OidcReturnType, TokenRequestOptions,
    },
};

use super::helpers::{normalize_authority, resolve_tenant, validate_tenant_id, DEFAULT_AUTHORITY};

/// # CacheSlot
/// A token cache together with who owns it.
///
/// Caches the client creates itself are [CacheSlot::Owned]: created on first use and left out
/// of snapshots. Caches handed in by the caller are [CacheSlot::Borrowed] and are kept in
/// snapshots.
#[derive(Debug)]
pub enum CacheSlot {
    /// Created lazily by the client
    Owned(OnceLock<Arc<dyn TokenCache>>),
    /// Supplied by the caller
    Borrowed(Arc<dyn TokenCache>),
}

impl CacheSlot {
    fn from_option(cache: Option<Arc<dyn TokenCache>>) -> Self {
        match cache {
            Some(c) => CacheSlot::Borrowed(c),
            None => CacheSlot::Owned(OnceLock::new()),
        }
    }

    /// Whether the cache was supplied by the caller
    pub fn is_borrowed(&self) -> bool {
        matches!(self, CacheSlot::Borrowed(_))
    }

    /// Whether a cache exists in this slot yet
    pub fn is_initialized(&self) -> bool {
        match self {
            CacheSlot::Owned(cell) => cell.get().is_some(),
            CacheSlot::Borrowed(_) => true,
        }
    }
}

/// # ClientSnapshot
/// Serializable state of a [ClientCore]. Caches are only included when they are borrowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSnapshot {
    /// Normalized authority
    pub authority: String,
    /// Configured tenant
    pub tenant_id: String,
    /// Client id
    pub client_id: String,
    /// Additionally allowed tenants
    pub additionally_allowed_tenants: Vec<String>,
    /// Persistence options for client created caches
    pub cache_persistence_options: Option<CachePersistenceOptions>,
    /// Whether tenant overrides are ignored
    pub disable_multitenant_auth: bool,
    /// Serialized borrowed cache
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
    /// Serialized borrowed CAE cache
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cae_cache: Option<String>,
}

/// # ClientCore
/// State and protocol logic shared by the blocking and the async token clients:
/// authority and tenant resolution, request construction, response processing and the
/// token caches.
#[derive(Debug)]
pub struct ClientCore {
    pub(crate) authority: String,
    pub(crate) tenant_id: String,
    pub(crate) client_id: String,
    pub(crate) additionally_allowed_tenants: Vec<String>,
    pub(crate) disable_multitenant_auth: bool,
    pub(crate) cache: CacheSlot,
    pub(crate) cae_cache: CacheSlot,
    pub(crate) cache_options: Option<CachePersistenceOptions>,
    pub(crate) is_adfs: bool,
}

impl ClientCore {
    /// # Create a [ClientCore]
    ///
    /// - `tenant_id` - tenant requests go to by default. `adfs` selects ADFS compatibility
    /// - `client_id` - the application's client id
    /// - `options` - see [ClientCoreOptions]
    pub fn new(tenant_id: &str, client_id: &str, options: ClientCoreOptions) -> OidcReturnType<Self> {
        validate_tenant_id(tenant_id)?;

        if client_id.is_empty() {
            return Err(Box::new(OidcClientError::new_type_error(
                "client_id is required",
                None,
            )));
        }

        let authority = match options.authority.as_deref() {
            Some(a) => normalize_authority(a)?,
            None => DEFAULT_AUTHORITY.to_string(),
        };

        Ok(Self {
            authority,
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            additionally_allowed_tenants: options.additionally_allowed_tenants,
            disable_multitenant_auth: options.disable_multitenant_auth,
            cache: CacheSlot::from_option(options.cache),
            cae_cache: CacheSlot::from_option(options.cae_cache),
            cache_options: options.cache_persistence_options,
            is_adfs: tenant_id.eq_ignore_ascii_case("adfs"),
        })
    }

    /// Normalized authority
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Configured tenant
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Client id
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Whether the client talks to ADFS
    pub fn is_adfs(&self) -> bool {
        self.is_adfs
    }

    /// The slot of the normal or the CAE cache
    pub fn cache_slot(&self, is_cae: bool) -> &CacheSlot {
        if is_cae {
            &self.cae_cache
        } else {
            &self.cache
        }
    }

    /// Tenant a request with `options` goes to
    pub fn resolve_tenant(&self, options: &TokenRequestOptions) -> OidcReturnType<String> {
        resolve_tenant(
            &self.tenant_id,
            options.tenant_id.as_deref(),
            &self.additionally_allowed_tenants,
            self.disable_multitenant_auth,
        )
    }

    /// `{authority}/{tenant}/oauth2/v2.0/token` for the tenant of the request
    pub fn get_token_url(&self, options: &TokenRequestOptions) -> OidcReturnType<Url> {
        let tenant = self.resolve_tenant(options)?;

        Url::parse(&format!("{}/{tenant}/oauth2/v2.0/token", self.authority)).map_err(|_| {
            Box::new(OidcClientError::new_type_error(
                "could not build a token endpoint URL from the authority",
                None,
            ))
        })
    }

    /// The cache selected by `enable_cae`, created on first use
    pub fn get_cache(&self, options: &TokenRequestOptions) -> OidcReturnType<TokenCacheAdapter> {
        let is_cae = options.enable_cae;

        let cache = match self.cache_slot(is_cae) {
            CacheSlot::Borrowed(cache) => cache.clone(),
            CacheSlot::Owned(cell) => match cell.get() {
                Some(cache) => cache.clone(),
                None => {
                    let created = self.initialize_cache(is_cae)?;
                    cell.get_or_init(|| created).clone()
                }
            },
        };

        Ok(TokenCacheAdapter::new(cache))
    }

    fn initialize_cache(&self, is_cae: bool) -> OidcReturnType<Arc<dyn TokenCache>> {
        match &self.cache_options {
            Some(options) => {
                debug!(is_cae, name = %options.name, "initializing persistent token cache");
                load_persistent_cache(options, is_cae)
            }
            None => {
                debug!(is_cae, "initializing in-memory token cache");
                Ok(Arc::new(InMemoryTokenCache::new()))
            }
        }
    }

    /// A cached access token for `scopes` that has not expired, without touching the network
    pub fn find_valid_access_token(
        &self,
        scopes: &[String],
        options: &TokenRequestOptions,
    ) -> OidcReturnType<Option<AccessTokenInfo>> {
        let tenant = self.resolve_tenant(options)?;
        let cache = self.get_cache(options)?;

        Ok(cache.find_valid_access_token(scopes, &self.client_id, &tenant, now()))
    }

    /// Cached refresh tokens for `scopes`. All of them are assumed to belong to the same user.
    pub fn list_refresh_tokens(
        &self,
        scopes: &[String],
        options: &TokenRequestOptions,
    ) -> OidcReturnType<Vec<CacheEntry>> {
        Ok(self.get_cache(options)?.list_refresh_tokens(scopes))
    }

    /// Serializable state of the client. Caches created by the client are left out.
    pub fn snapshot(&self) -> OidcReturnType<ClientSnapshot> {
        let serialize_borrowed = |slot: &CacheSlot| -> OidcReturnType<Option<String>> {
            match slot {
                CacheSlot::Borrowed(cache) => cache.serialize().map(Some),
                CacheSlot::Owned(_) => Ok(None),
            }
        };

        Ok(ClientSnapshot {
            authority: self.authority.clone(),
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            additionally_allowed_tenants: self.additionally_allowed_tenants.clone(),
            cache_persistence_options: self.cache_options.clone(),
            disable_multitenant_auth: self.disable_multitenant_auth,
            cache: serialize_borrowed(&self.cache)?,
            cae_cache: serialize_borrowed(&self.cae_cache)?,
        })
    }

    /// Rebuilds a client from a [ClientSnapshot]. Borrowed caches come back with their content,
    /// owned ones come back uninitialized.
    pub fn restore(snapshot: ClientSnapshot) -> OidcReturnType<Self> {
        let restore_slot = |serialized: Option<&String>| -> OidcReturnType<CacheSlot> {
            match serialized {
                Some(s) => Ok(CacheSlot::Borrowed(Arc::new(InMemoryTokenCache::deserialize(s)?))),
                None => Ok(CacheSlot::Owned(OnceLock::new())),
            }
        };

        let cache = restore_slot(snapshot.cache.as_ref())?;
        let cae_cache = restore_slot(snapshot.cae_cache.as_ref())?;

        let mut core = Self::new(
            &snapshot.tenant_id,
            &snapshot.client_id,
            ClientCoreOptions {
                authority: Some(snapshot.authority),
                additionally_allowed_tenants: snapshot.additionally_allowed_tenants,
                cache_persistence_options: snapshot.cache_persistence_options,
                disable_multitenant_auth: snapshot.disable_multitenant_auth,
                ..Default::default()
            },
        )?;

        core.cache = cache;
        core.cae_cache = cae_cache;

        Ok(core)
    }
}

#[cfg(test)]
#[path = "../tests/client/mod.rs"]
mod client_tests;
