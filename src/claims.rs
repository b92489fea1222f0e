//! # Claims
//! Merges client capabilities into a claims challenge

use serde_json::{json, Map, Value};

use crate::types::{OidcClientError, OidcReturnType};

/// Capability advertised when a CAE token is requested
pub const CAE_CAPABILITY: &str = "CP1";

/// Merges `capabilities` into `claims_challenge` as `access_token.xms_cc.values`.
///
/// Returns `claims_challenge` untouched when there are no capabilities. An existing
/// `xms_cc` is replaced; every other key of the challenge is kept.
pub fn merge_claims_challenge_and_capabilities<S: AsRef<str>>(
    capabilities: &[S],
    claims_challenge: Option<&str>,
) -> OidcReturnType<Option<String>> {
    if capabilities.is_empty() {
        return Ok(claims_challenge.map(str::to_string));
    }

    let mut claims = match claims_challenge.filter(|c| !c.is_empty()) {
        Some(challenge) => match serde_json::from_str::<Value>(challenge) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(Box::new(OidcClientError::new_type_error(
                    "claims challenge must be a JSON object",
                    None,
                )))
            }
            Err(e) => {
                return Err(Box::new(OidcClientError::new_type_error(
                    &format!("claims challenge is not valid JSON: {e}"),
                    None,
                )))
            }
        },
        None => Map::new(),
    };

    let values: Vec<&str> = capabilities.iter().map(|c| c.as_ref()).collect();

    let access_token = claims
        .entry("access_token")
        .or_insert_with(|| Value::Object(Map::new()));

    match access_token {
        Value::Object(access_token) => {
            access_token.insert("xms_cc".to_string(), json!({ "values": values }));
        }
        _ => {
            return Err(Box::new(OidcClientError::new_type_error(
                "access_token in the claims challenge must be a JSON object",
                None,
            )))
        }
    }

    serde_json::to_string(&claims).map(Some).map_err(|_| {
        Box::new(OidcClientError::new_error(
            "could not serialize the claims challenge",
            None,
        ))
    })
}

#[cfg(test)]
#[path = "./tests/claims_tests.rs"]
mod claims_tests;
