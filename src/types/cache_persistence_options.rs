use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// # CachePersistenceOptions
/// Where and how a persistent token cache is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePersistenceOptions {
    /// Cache name. The CAE cache is stored as `<name>.cae`, the other as `<name>.nocae`
    pub name: String,
    /// Directory holding the cache files. Defaults to `$HOME/.IdentityService`
    pub directory: Option<PathBuf>,
    /// Allow writing tokens to disk in plain text.
    /// Must be `true`: no encrypted store is available.
    pub allow_unencrypted_storage: bool,
}

impl Default for CachePersistenceOptions {
    fn default() -> Self {
        Self {
            name: "msal.cache".to_string(),
            directory: None,
            allow_unencrypted_storage: false,
        }
    }
}
