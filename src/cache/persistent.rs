use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::types::{CachePersistenceOptions, OidcClientError, OidcReturnType};

use super::{CacheEntry, CacheEvent, CredentialType, InMemoryTokenCache, TokenCache};

/// # PersistentTokenCache
/// Token cache stored as a plain JSON file. The file is read once when the cache is opened
/// and rewritten after every change.
#[derive(Debug)]
pub struct PersistentTokenCache {
    inner: InMemoryTokenCache,
    path: PathBuf,
}

impl PersistentTokenCache {
    /// Opens the cache stored at `path`, starting empty when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> OidcReturnType<Self> {
        let path = path.into();

        let inner = match fs::read_to_string(&path) {
            Ok(content) if !content.trim().is_empty() => {
                InMemoryTokenCache::deserialize(&content)?
            }
            Ok(_) => InMemoryTokenCache::new(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => InMemoryTokenCache::new(),
            Err(e) => {
                return Err(Box::new(OidcClientError::new_error(
                    &format!("could not read the token cache at {}: {e}", path.display()),
                    None,
                )))
            }
        };

        Ok(Self { inner, path })
    }

    /// Location of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> OidcReturnType<()> {
        let serialized = self.inner.serialize()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        fs::write(&self.path, serialized).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, e: std::io::Error) -> Box<OidcClientError> {
        Box::new(OidcClientError::new_error(
            &format!("could not write the token cache at {}: {e}", self.path.display()),
            None,
        ))
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> super::in_memory::CacheState {
        self.inner.snapshot()
    }
}

impl TokenCache for PersistentTokenCache {
    fn search(
        &self,
        credential_type: CredentialType,
        target: Option<&[String]>,
        query: &[(&str, &str)],
    ) -> Vec<CacheEntry> {
        self.inner.search(credential_type, target, query)
    }

    fn add(&self, event: CacheEvent, now: i64) -> OidcReturnType<()> {
        self.inner.add(event, now)?;
        self.persist()
    }

    fn remove_rt(&self, entry: &CacheEntry) -> OidcReturnType<()> {
        self.inner.remove_rt(entry)?;
        self.persist()
    }

    fn update_rt(&self, entry: &CacheEntry, new_secret: &str) -> OidcReturnType<()> {
        self.inner.update_rt(entry, new_secret)?;
        self.persist()
    }

    fn serialize(&self) -> OidcReturnType<String> {
        self.inner.serialize()
    }
}

/// Opens the persistent cache described by `options`. CAE and non CAE tokens live in
/// separate files.
pub fn load_persistent_cache(
    options: &CachePersistenceOptions,
    is_cae: bool,
) -> OidcReturnType<Arc<dyn TokenCache>> {
    if !options.allow_unencrypted_storage {
        return Err(Box::new(OidcClientError::new_type_error(
            "encrypted token cache storage is not available; set allow_unencrypted_storage to store tokens in plain text",
            None,
        )));
    }

    let directory = match &options.directory {
        Some(d) => d.clone(),
        None => default_cache_directory()?,
    };

    let suffix = if is_cae { "cae" } else { "nocae" };
    let path = directory.join(format!("{}.{suffix}", options.name));

    debug!(path = %path.display(), is_cae, "opening persistent token cache");

    Ok(Arc::new(PersistentTokenCache::open(path)?))
}

fn default_cache_directory() -> OidcReturnType<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".IdentityService"))
        .ok_or(Box::new(OidcClientError::new_type_error(
            "no cache directory configured and no home directory found",
            None,
        )))
}
