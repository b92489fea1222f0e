use std::{collections::HashMap, sync::Arc};

use serde_json::{json, Value};

use crate::{
    certificate::PemClientCertificate,
    client::ClientCore,
    helpers::form_url_encoded_to_string_map,
    tests::{client_core, scopes, CERTIFICATE_PEM, TOKEN_URL},
    types::{ClientCoreOptions, ClientCredential, HttpMethod, HttpRequest, TokenRequestOptions},
};

use super::{JWT_BEARER_ASSERTION, JWT_BEARER_GRANT};

fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn assert_token_request(request: &HttpRequest, url: &str) {
    assert_eq!(url, request.url.as_str());
    assert_eq!(HttpMethod::POST, request.method);
    assert_eq!(
        Some(&vec!["application/json".to_string()]),
        request.headers.get("accept")
    );
    assert_eq!(
        Some(&vec!["application/x-www-form-urlencoded".to_string()]),
        request.headers.get("content-type")
    );
    assert_eq!(
        Some(request.form.clone()),
        request.body.as_deref().map(form_url_encoded_to_string_map)
    );
}

fn assertion_claims(assertion: &str) -> (Value, Value) {
    let parts: Vec<&str> = assertion.split('.').collect();
    let decode = |s: &str| -> Value {
        serde_json::from_slice(&base64_url::decode(s).unwrap()).unwrap()
    };
    (decode(parts[0]), decode(parts[1]))
}

fn certificate() -> Arc<PemClientCertificate> {
    Arc::new(PemClientCertificate::from_pem(CERTIFICATE_PEM).unwrap())
}

#[test]
fn builds_an_authorization_code_request() {
    let core = client_core(ClientCoreOptions::default());

    let request = core
        .get_auth_code_request(
            &scopes(&["scope-a", "scope-b"]),
            "the-code",
            "https://localhost/callback",
            None,
            &TokenRequestOptions::default(),
        )
        .unwrap();

    assert_token_request(&request, TOKEN_URL);
    assert_eq!(
        form(&[
            ("client_id", "client-id"),
            ("grant_type", "authorization_code"),
            ("scope", "scope-a scope-b"),
            ("code", "the-code"),
            ("redirect_uri", "https://localhost/callback"),
        ]),
        request.form
    );
}

#[test]
fn authorization_code_request_sends_a_non_empty_client_secret() {
    let core = client_core(ClientCoreOptions::default());
    let options = TokenRequestOptions::default();

    let request = core
        .get_auth_code_request(&scopes(&["s"]), "c", "https://r", Some("secret"), &options)
        .unwrap();
    assert_eq!(Some("secret"), request.form_value("client_secret"));

    let request = core
        .get_auth_code_request(&scopes(&["s"]), "c", "https://r", Some(""), &options)
        .unwrap();
    assert_eq!(None, request.form_value("client_secret"));
}

#[test]
fn cae_requests_carry_the_client_capability() {
    let core = client_core(ClientCoreOptions::default());

    let request = core
        .get_client_secret_request(
            &scopes(&["s"]),
            "secret",
            &TokenRequestOptions::default().enable_cae(true),
        )
        .unwrap();

    let claims: Value = serde_json::from_str(request.form_value("claims").unwrap()).unwrap();
    assert_eq!(json!({"access_token": {"xms_cc": {"values": ["CP1"]}}}), claims);
}

#[test]
fn claims_challenge_is_merged_with_the_capability() {
    let core = client_core(ClientCoreOptions::default());

    let request = core
        .get_client_secret_request(
            &scopes(&["s"]),
            "secret",
            &TokenRequestOptions::default()
                .enable_cae(true)
                .claims(r#"{"access_token":{"nbf":{"essential":true}}}"#),
        )
        .unwrap();

    let claims: Value = serde_json::from_str(request.form_value("claims").unwrap()).unwrap();
    assert_eq!(
        json!({"access_token": {"nbf": {"essential": true}, "xms_cc": {"values": ["CP1"]}}}),
        claims
    );
}

#[test]
fn claims_challenge_is_sent_as_is_without_cae() {
    let core = client_core(ClientCoreOptions::default());
    let challenge = r#"{"access_token":{"nbf":{"essential":true}}}"#;

    let request = core
        .get_client_secret_request(
            &scopes(&["s"]),
            "secret",
            &TokenRequestOptions::default().claims(challenge),
        )
        .unwrap();
    assert_eq!(Some(challenge), request.form_value("claims"));

    let request = core
        .get_client_secret_request(&scopes(&["s"]), "secret", &TokenRequestOptions::default())
        .unwrap();
    assert_eq!(None, request.form_value("claims"));
}

#[test]
fn a_malformed_claims_challenge_fails_the_request() {
    let core = client_core(ClientCoreOptions::default());

    let err = core
        .get_client_secret_request(
            &scopes(&["s"]),
            "secret",
            &TokenRequestOptions::default().enable_cae(true).claims("nope"),
        )
        .unwrap_err();

    assert!(err.is_type_error());
}

#[test]
fn builds_a_jwt_assertion_request() {
    let core = client_core(ClientCoreOptions::default());

    let request = core
        .get_jwt_assertion_request(&scopes(&["s"]), "the.assertion.jwt", &TokenRequestOptions::default())
        .unwrap();

    assert_token_request(&request, TOKEN_URL);
    assert_eq!(
        form(&[
            ("client_id", "client-id"),
            ("grant_type", "client_credentials"),
            ("scope", "s"),
            ("client_assertion", "the.assertion.jwt"),
            ("client_assertion_type", JWT_BEARER_ASSERTION),
        ]),
        request.form
    );
}

#[test]
fn builds_a_client_certificate_request() {
    let core = client_core(ClientCoreOptions::default());
    let certificate = certificate();

    let request = core
        .get_client_certificate_request(
            &scopes(&["s"]),
            certificate.as_ref(),
            &TokenRequestOptions::default(),
        )
        .unwrap();

    assert_token_request(&request, TOKEN_URL);
    assert_eq!(Some("client_credentials"), request.form_value("grant_type"));
    assert_eq!(
        Some(JWT_BEARER_ASSERTION),
        request.form_value("client_assertion_type")
    );

    let (header, payload) = assertion_claims(request.form_value("client_assertion").unwrap());
    assert_eq!("PS256", header["alg"]);
    assert_eq!(TOKEN_URL, payload["aud"]);
    assert_eq!("client-id", payload["iss"]);
}

#[test]
fn adfs_certificate_assertions_use_legacy_signing() {
    let core = ClientCore::new(
        "adfs",
        "client-id",
        ClientCoreOptions::default().authority("https://adfs.contoso.com"),
    )
    .unwrap();

    let assertion = core
        .get_client_certificate_assertion(certificate().as_ref(), &TokenRequestOptions::default())
        .unwrap();

    let (header, payload) = assertion_claims(&assertion);
    assert_eq!("RS256", header["alg"]);
    assert!(header.get("x5t").is_some());
    assert_eq!(
        "https://adfs.contoso.com/adfs/oauth2/v2.0/token",
        payload["aud"]
    );
}

#[test]
fn builds_a_client_secret_request() {
    let core = client_core(ClientCoreOptions::default());

    let request = core
        .get_client_secret_request(&scopes(&["s"]), "secret", &TokenRequestOptions::default())
        .unwrap();

    assert_token_request(&request, TOKEN_URL);
    assert_eq!(
        form(&[
            ("client_id", "client-id"),
            ("grant_type", "client_credentials"),
            ("scope", "s"),
            ("client_secret", "secret"),
        ]),
        request.form
    );
}

#[test]
fn builds_a_refresh_token_request() {
    let core = client_core(ClientCoreOptions::default());

    let request = core
        .get_refresh_token_request(&scopes(&["s"]), "the-rt", &TokenRequestOptions::default())
        .unwrap();

    assert_token_request(&request, TOKEN_URL);
    assert_eq!(
        form(&[
            ("client_id", "client-id"),
            ("grant_type", "refresh_token"),
            ("scope", "s"),
            ("refresh_token", "the-rt"),
            ("client_info", "1"),
        ]),
        request.form
    );

    let request = core
        .get_refresh_token_request(
            &scopes(&["s"]),
            "the-rt",
            &TokenRequestOptions::default().client_secret("secret"),
        )
        .unwrap();
    assert_eq!(Some("secret"), request.form_value("client_secret"));
}

#[test]
fn builds_on_behalf_of_requests_for_every_credential() {
    let core = client_core(ClientCoreOptions::default());
    let options = TokenRequestOptions::default();

    let request = core
        .get_on_behalf_of_request(
            &scopes(&["s"]),
            &ClientCredential::Secret("secret".to_string()),
            "user-assertion",
            &options,
        )
        .unwrap();

    assert_token_request(&request, TOKEN_URL);
    assert_eq!(
        form(&[
            ("client_id", "client-id"),
            ("grant_type", JWT_BEARER_GRANT),
            ("scope", "s"),
            ("assertion", "user-assertion"),
            ("requested_token_use", "on_behalf_of"),
            ("client_secret", "secret"),
        ]),
        request.form
    );

    let request = core
        .get_on_behalf_of_request(
            &scopes(&["s"]),
            &ClientCredential::AssertionProvider(Arc::new(|| "provided.assertion".to_string())),
            "user-assertion",
            &options,
        )
        .unwrap();
    assert_eq!(
        Some("provided.assertion"),
        request.form_value("client_assertion")
    );
    assert_eq!(
        Some(JWT_BEARER_ASSERTION),
        request.form_value("client_assertion_type")
    );
    assert_eq!(None, request.form_value("client_secret"));

    let request = core
        .get_on_behalf_of_request(
            &scopes(&["s"]),
            &ClientCredential::Certificate(certificate()),
            "user-assertion",
            &options,
        )
        .unwrap();
    let (_, payload) = assertion_claims(request.form_value("client_assertion").unwrap());
    assert_eq!(TOKEN_URL, payload["aud"]);
}

#[test]
fn on_behalf_of_assertions_target_the_requested_tenant() {
    let core = client_core(
        ClientCoreOptions::default().additionally_allowed_tenants(vec!["other".to_string()]),
    );

    let request = core
        .get_on_behalf_of_request(
            &scopes(&["s"]),
            &ClientCredential::Certificate(certificate()),
            "user-assertion",
            &TokenRequestOptions::default().tenant_id("other"),
        )
        .unwrap();

    let url = "https://login.microsoftonline.com/other/oauth2/v2.0/token";
    assert_eq!(url, request.url.as_str());

    let (_, payload) = assertion_claims(request.form_value("client_assertion").unwrap());
    assert_eq!(url, payload["aud"]);
}

#[test]
fn builds_a_refresh_token_on_behalf_of_request() {
    let core = client_core(ClientCoreOptions::default());

    let request = core
        .get_refresh_token_on_behalf_of_request(
            &scopes(&["s"]),
            &ClientCredential::Secret("secret".to_string()),
            "the-rt",
            &TokenRequestOptions::default(),
        )
        .unwrap();

    assert_token_request(&request, TOKEN_URL);
    assert_eq!(
        form(&[
            ("client_id", "client-id"),
            ("grant_type", "refresh_token"),
            ("scope", "s"),
            ("refresh_token", "the-rt"),
            ("client_info", "1"),
            ("client_secret", "secret"),
        ]),
        request.form
    );
}

#[test]
fn requests_for_a_disallowed_tenant_are_not_built() {
    let core = client_core(ClientCoreOptions::default());

    let err = core
        .get_client_secret_request(
            &scopes(&["s"]),
            "secret",
            &TokenRequestOptions::default().tenant_id("other"),
        )
        .unwrap_err();

    assert!(err.is_authentication_error());
}
