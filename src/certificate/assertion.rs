use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    helpers::now,
    types::{OidcClientError, OidcReturnType},
};

use super::ClientCertificate;

/// Seconds a client assertion stays valid
pub const ASSERTION_LIFETIME_SECS: i64 = 60 * 30;

/// Builds and signs a compact JWT client assertion for `audience`.
///
/// `is_legacy_mode` is for ADFS: the assertion is signed with RS256 and carries the SHA-1
/// thumbprint as `x5t`. Otherwise PS256 and the SHA-256 thumbprint as `x5t#S256` are used.
pub fn sign_client_assertion(
    certificate: &dyn ClientCertificate,
    audience: &str,
    client_id: &str,
    is_legacy_mode: bool,
) -> OidcReturnType<String> {
    let iat = now();

    let mut header = Map::new();
    header.insert("typ".to_string(), json!("JWT"));
    if is_legacy_mode {
        header.insert("alg".to_string(), json!("RS256"));
        header.insert("x5t".to_string(), json!(certificate.thumbprint()));
    } else {
        header.insert("alg".to_string(), json!("PS256"));
        header.insert("x5t#S256".to_string(), json!(certificate.sha256_thumbprint()));
    }

    let payload = json!({
        "jti": Uuid::new_v4().to_string(),
        "aud": audience,
        "iss": client_id,
        "sub": client_id,
        "nbf": iat,
        "exp": iat + ASSERTION_LIFETIME_SECS,
    });

    let signing_input = format!(
        "{}.{}",
        base64_url::encode(&to_json_bytes(&Value::Object(header))?),
        base64_url::encode(&to_json_bytes(&payload)?)
    );

    let signature = if is_legacy_mode {
        certificate.sign_rs256(signing_input.as_bytes())?
    } else {
        certificate.sign_ps256(signing_input.as_bytes())?
    };

    Ok(format!("{signing_input}.{}", base64_url::encode(&signature)))
}

fn to_json_bytes(value: &Value) -> OidcReturnType<Vec<u8>> {
    serde_json::to_vec(value).map_err(|_| {
        Box::new(OidcClientError::new_error(
            "could not convert the client assertion to bytes",
            None,
        ))
    })
}

#[cfg(test)]
#[path = "../tests/assertion_tests.rs"]
mod assertion_tests;
