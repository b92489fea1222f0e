use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    cache::{CacheEvent, TokenCacheAdapter},
    helpers::{get_int, get_str, scrub_secrets},
    types::{
        AccessTokenInfo, HttpRequest, HttpResponse, OidcClientError, OidcReturnType,
        TokenRequestOptions,
    },
};

use super::ClientCore;

/// Tokens living at least this long get a synthesized `refresh_in` of half their lifetime
const PROACTIVE_REFRESH_THRESHOLD_SECS: i64 = 7200;

impl ClientCore {
    /// Turns a token endpoint response into an [AccessTokenInfo] and caches it.
    ///
    /// - `request` - the request the response answers
    /// - `request_time` - when the request was sent, seconds since the epoch
    /// - `options` - options of the request; `enable_cae` selects the cache
    pub fn process_response(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
        request_time: i64,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let mut content = decode_content(&response)?;

        let cache = self.get_cache(options)?;

        if request.form_value("grant_type") == Some("refresh_token") {
            if let Some(refresh_token) = request.form_value("refresh_token") {
                reconcile_refresh_token(&cache, refresh_token, &mut content)?;
            }
        }

        raise_for_error(&response, &mut content)?;

        let expires_on = match (
            get_int(&content, "expires_on"),
            get_int(&content, "expires_in"),
        ) {
            (Some(expires_on), _) => expires_on,
            (None, Some(expires_in)) => request_time
                .checked_add(expires_in)
                .ok_or_else(|| unexpected_response(&content))?,
            (None, None) => return Err(unexpected_response(&content)),
        };

        let expires_in = match get_int(&content, "expires_in").filter(|e| *e != 0) {
            Some(expires_in) => expires_in,
            None => expires_on
                .checked_sub(request_time)
                .ok_or_else(|| unexpected_response(&content))?,
        };

        if !content.contains_key("refresh_in") && expires_in >= PROACTIVE_REFRESH_THRESHOLD_SECS {
            content.insert("refresh_in".to_string(), Value::from(expires_in / 2));
        }

        let refresh_on = match get_int(&content, "refresh_in") {
            Some(refresh_in) => Some(
                request_time
                    .checked_add(refresh_in)
                    .ok_or_else(|| unexpected_response(&content))?,
            ),
            None => None,
        };

        let access_token =
            get_str(&content, "access_token").ok_or_else(|| unexpected_response(&content))?;

        let token = AccessTokenInfo::new(
            access_token,
            expires_on,
            get_str(&content, "token_type").map(str::to_string),
            refresh_on,
        );

        let scope = request
            .form_value("scope")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        // the cache takes ownership of the content, so this has to come last
        cache.add(
            CacheEvent {
                client_id: self.client_id.clone(),
                response: content,
                scope,
                token_endpoint: request.url.to_string(),
                refresh_token: request.form_value("refresh_token").map(str::to_string),
            },
            request_time,
        )?;

        Ok(token)
    }
}

/// Error for a success response that cannot be turned into a token. Carries no response so
/// the tokens in it stay out of the error.
fn unexpected_response(content: &Map<String, Value>) -> Box<OidcClientError> {
    let mut scrubbed = content.clone();
    scrub_secrets(&mut scrubbed);

    Box::new(OidcClientError::new_authentication_error(
        &format!(
            "Unexpected response from the token endpoint: {}",
            Value::Object(scrubbed)
        ),
        None,
        None,
        None,
    ))
}

fn decode_content(response: &HttpResponse) -> OidcReturnType<Map<String, Value>> {
    let decoded = response
        .body
        .as_deref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok());

    match decoded {
        Some(Value::Object(content)) => Ok(content),
        _ => Err(Box::new(OidcClientError::new_authentication_error(
            &format!(
                "Unexpected response from the token endpoint: status {} without a JSON object body",
                response.status_code
            ),
            None,
            None,
            Some(response.clone()),
        ))),
    }
}

/// Keeps the cache in line with the outcome of a refresh token grant.
///
/// An `invalid_grant` evicts every entry holding the used refresh token. A rotated refresh
/// token replaces the old secret in place when exactly one entry holds it, and is then removed
/// from `content` so caching the response does not add a second entry. With zero or several
/// matching entries the cache is in an unknown state and is left untouched.
fn reconcile_refresh_token(
    cache: &TokenCacheAdapter,
    refresh_token: &str,
    content: &mut Map<String, Value>,
) -> OidcReturnType<()> {
    if get_str(content, "error") == Some("invalid_grant") {
        let invalid = cache.find_refresh_tokens_by_secret(refresh_token);

        warn!(count = invalid.len(), "refresh token rejected, evicting it from the cache");

        for entry in &invalid {
            cache.evict_refresh_token(entry)?;
        }
    }

    if let Some(new_refresh_token) = get_str(content, "refresh_token").map(str::to_string) {
        let entries = cache.find_refresh_tokens_by_secret(refresh_token);

        if let [entry] = entries.as_slice() {
            debug!("refresh token rotated, updating the cached entry");
            cache.update_refresh_token(entry, &new_refresh_token)?;
            content.remove("refresh_token");
        } else {
            debug!(
                matches = entries.len(),
                "refresh token rotated but the cache state is ambiguous, leaving it as is"
            );
        }
    }

    Ok(())
}

fn raise_for_error(response: &HttpResponse, content: &mut Map<String, Value>) -> OidcReturnType<()> {
    if !content.contains_key("error") {
        return Ok(());
    }

    scrub_secrets(content);

    let error = content.get("error").map(value_to_string);
    let error_description = content.get("error_description").map(value_to_string);

    warn!(error = error.as_deref().unwrap_or_default(), "token endpoint returned an error");

    let message = match (&error, &error_description) {
        (Some(e), Some(d)) => format!("Token endpoint error '({e}) {d}'"),
        _ => format!("Token endpoint error '{}'", Value::Object(content.clone())),
    };

    Err(Box::new(OidcClientError::new_authentication_error(
        &message,
        error,
        error_description,
        Some(response.clone()),
    )))
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/client/response_processor_tests.rs"]
mod response_processor_tests;
