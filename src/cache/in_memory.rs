use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use url::Url;

use crate::{
    helpers::{get_int, get_str, join_scopes},
    types::{OidcClientError, OidcReturnType},
};

use super::{CacheEntry, CacheEvent, CredentialType, TokenCache};

/// Lifetime assumed when a response carries neither `expires_on` nor `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3599;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct CacheState {
    #[serde(rename = "AccessToken", default)]
    access_tokens: Vec<CacheEntry>,
    #[serde(rename = "RefreshToken", default)]
    refresh_tokens: Vec<CacheEntry>,
}

impl CacheState {
    pub(crate) fn entries(&self, credential_type: CredentialType) -> &Vec<CacheEntry> {
        match credential_type {
            CredentialType::AccessToken => &self.access_tokens,
            CredentialType::RefreshToken => &self.refresh_tokens,
        }
    }
}

/// # InMemoryTokenCache
/// Token cache kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryTokenCache {
    state: Mutex<CacheState>,
}

impl InMemoryTokenCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a cache from the output of [TokenCache::serialize]
    pub fn deserialize(serialized: &str) -> OidcReturnType<Self> {
        let state = serde_json::from_str::<CacheState>(serialized).map_err(|_| {
            Box::new(OidcClientError::new_type_error(
                "serialized token cache is malformed",
                None,
            ))
        })?;

        Ok(Self {
            state: Mutex::new(state),
        })
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> CacheState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenCache for InMemoryTokenCache {
    fn search(
        &self,
        credential_type: CredentialType,
        target: Option<&[String]>,
        query: &[(&str, &str)],
    ) -> Vec<CacheEntry> {
        let state = self.lock();

        state
            .entries(credential_type)
            .iter()
            .filter(|entry| is_matching(entry, target, query))
            .cloned()
            .collect()
    }

    fn add(&self, event: CacheEvent, now: i64) -> OidcReturnType<()> {
        let url = Url::parse(&event.token_endpoint).map_err(|_| {
            Box::new(OidcClientError::new_type_error(
                "token_endpoint of a cache event must be an absolute URL",
                None,
            ))
        })?;

        let environment = url.host_str().unwrap_or_default().to_string();
        let realm = url
            .path_segments()
            .and_then(|mut s| s.next())
            .unwrap_or_default()
            .to_string();
        let target = join_scopes(&event.scope);
        let response = &event.response;
        let home_account_id = home_account_id(response);

        let mut state = self.lock();

        if let Some(access_token) = get_str(response, "access_token") {
            let expires_on = get_int(response, "expires_on").unwrap_or_else(|| {
                now.saturating_add(get_int(response, "expires_in").unwrap_or(DEFAULT_EXPIRES_IN))
            });

            let mut entry = Map::new();
            entry.insert("credential_type".to_string(), json!("AccessToken"));
            entry.insert("secret".to_string(), json!(access_token));
            entry.insert("client_id".to_string(), json!(event.client_id));
            entry.insert("environment".to_string(), json!(environment));
            entry.insert("realm".to_string(), json!(realm));
            entry.insert("target".to_string(), json!(target));
            entry.insert(
                "token_type".to_string(),
                json!(get_str(response, "token_type").unwrap_or("Bearer")),
            );
            entry.insert("cached_at".to_string(), json!(now.to_string()));
            entry.insert("expires_on".to_string(), json!(expires_on.to_string()));
            if let Some(refresh_in) = get_int(response, "refresh_in") {
                entry.insert(
                    "refresh_on".to_string(),
                    json!(now.saturating_add(refresh_in).to_string()),
                );
            }
            if let Some(id) = &home_account_id {
                entry.insert("home_account_id".to_string(), json!(id));
            }

            state.access_tokens.retain(|existing| {
                !same_fields(
                    existing,
                    &entry,
                    &["client_id", "environment", "realm", "target", "home_account_id"],
                )
            });
            state.access_tokens.push(entry);
        }

        if let Some(refresh_token) = get_str(response, "refresh_token") {
            let mut entry = Map::new();
            entry.insert("credential_type".to_string(), json!("RefreshToken"));
            entry.insert("secret".to_string(), json!(refresh_token));
            entry.insert("client_id".to_string(), json!(event.client_id));
            entry.insert("environment".to_string(), json!(environment));
            entry.insert("target".to_string(), json!(target));
            entry.insert(
                "last_modification_time".to_string(),
                json!(now.to_string()),
            );
            if let Some(id) = &home_account_id {
                entry.insert("home_account_id".to_string(), json!(id));
            }

            let redeemed = event.refresh_token.as_deref();

            state.refresh_tokens.retain(|existing| {
                if redeemed.is_some() && get_str(existing, "secret") == redeemed {
                    true
                } else if home_account_id.is_some() {
                    !same_fields(
                        existing,
                        &entry,
                        &["client_id", "environment", "home_account_id"],
                    )
                } else {
                    existing.get("secret") != entry.get("secret")
                }
            });
            state.refresh_tokens.push(entry);
        }

        Ok(())
    }

    fn remove_rt(&self, entry: &CacheEntry) -> OidcReturnType<()> {
        self.lock().refresh_tokens.retain(|existing| existing != entry);
        Ok(())
    }

    fn update_rt(&self, entry: &CacheEntry, new_secret: &str) -> OidcReturnType<()> {
        let mut state = self.lock();

        if let Some(existing) = state.refresh_tokens.iter_mut().find(|e| *e == entry) {
            existing.insert("secret".to_string(), json!(new_secret));
            existing.insert(
                "last_modification_time".to_string(),
                json!(crate::helpers::now().to_string()),
            );
        }

        Ok(())
    }

    fn serialize(&self) -> OidcReturnType<String> {
        serde_json::to_string(&*self.lock()).map_err(|_| {
            Box::new(OidcClientError::new_error(
                "could not serialize the token cache",
                None,
            ))
        })
    }
}

fn is_matching(entry: &CacheEntry, target: Option<&[String]>, query: &[(&str, &str)]) -> bool {
    let query_matches = query
        .iter()
        .all(|(k, v)| entry.get(*k).and_then(Value::as_str) == Some(*v));

    if !query_matches {
        return false;
    }

    match target.filter(|t| !t.is_empty()) {
        Some(target) => {
            let in_entry: HashSet<&str> = get_str(entry, "target")
                .unwrap_or_default()
                .split_whitespace()
                .collect();
            target.iter().all(|scope| in_entry.contains(scope.as_str()))
        }
        None => true,
    }
}

fn same_fields(a: &CacheEntry, b: &CacheEntry, fields: &[&str]) -> bool {
    fields.iter().all(|f| a.get(*f) == b.get(*f))
}

/// `uid.utid` from the `client_info` the provider returns when asked with `client_info=1`
fn home_account_id(response: &Map<String, Value>) -> Option<String> {
    let client_info = get_str(response, "client_info")?;

    let decoded = general_purpose::URL_SAFE_NO_PAD
        .decode(client_info.trim_end_matches('='))
        .ok()?;
    let info = serde_json::from_slice::<Map<String, Value>>(&decoded).ok()?;

    Some(format!(
        "{}.{}",
        get_str(&info, "uid")?,
        get_str(&info, "utid")?
    ))
}
