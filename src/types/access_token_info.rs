use serde::{Deserialize, Serialize};

/// # AccessTokenInfo
/// An access token and the times that matter for using it.
/// Built once by the client and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenInfo {
    token: String,
    expires_on: i64,
    token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_on: Option<i64>,
}

impl AccessTokenInfo {
    /// # Create an [AccessTokenInfo] instance
    ///
    /// - `expires_on` - expiry as seconds since the epoch
    /// - `token_type` - defaults to `Bearer` when `None`
    /// - `refresh_on` - when the token should be proactively renewed, seconds since the epoch
    pub fn new(
        token: impl Into<String>,
        expires_on: i64,
        token_type: Option<String>,
        refresh_on: Option<i64>,
    ) -> Self {
        Self {
            token: token.into(),
            expires_on,
            token_type: token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_on,
        }
    }

    /// Gets the access token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Gets the expiry (seconds since the epoch)
    pub fn expires_on(&self) -> i64 {
        self.expires_on
    }

    /// Gets the token type
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Gets the proactive refresh time (seconds since the epoch)
    pub fn refresh_on(&self) -> Option<i64> {
        self.refresh_on
    }
}
