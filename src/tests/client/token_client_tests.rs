use std::sync::Arc;

use crate::{
    certificate::PemClientCertificate,
    tests::{
        scopes,
        test_http_client::{TestHttpClient, TestHttpReqRes},
        CERTIFICATE_PEM, TOKEN_URL,
    },
    types::{ClientCoreOptions, ClientCredential, HttpMethod, TokenRequestOptions},
};

use super::{AsyncClient, AsyncTokenClient, BlockingClient, TokenClient, JWT_BEARER_ASSERTION, JWT_BEARER_GRANT};

const TOKEN_RESPONSE: &str = r#"{"access_token":"tokenValue","expires_in":3600,"token_type":"Bearer"}"#;

fn token_request() -> TestHttpReqRes {
    TestHttpReqRes::new(TOKEN_URL)
        .assert_request_method(HttpMethod::POST)
        .assert_request_header("accept", vec!["application/json".to_string()])
        .assert_request_header(
            "content-type",
            vec!["application/x-www-form-urlencoded".to_string()],
        )
}

fn blocking_client(http_client: TestHttpClient) -> BlockingClient<TestHttpClient> {
    BlockingClient::new("tenant", "client-id", ClientCoreOptions::default(), http_client).unwrap()
}

fn async_client(http_client: TestHttpClient) -> AsyncClient<TestHttpClient> {
    AsyncClient::new("tenant", "client-id", ClientCoreOptions::default(), http_client).unwrap()
}

#[test]
fn blocking_client_secret_grant_returns_and_caches_the_token() {
    let http_client = token_request()
        .assert_request_form(&[
            ("client_id", "client-id"),
            ("grant_type", "client_credentials"),
            ("scope", "scope"),
            ("client_secret", "secret"),
        ])
        .set_response_body(TOKEN_RESPONSE)
        .build();

    let client = blocking_client(http_client);
    let options = TokenRequestOptions::default();

    assert!(client
        .get_cached_access_token(&scopes(&["scope"]), &options)
        .unwrap()
        .is_none());

    let token = client
        .obtain_token_by_client_secret(&scopes(&["scope"]), "secret", &options)
        .unwrap();

    assert_eq!("tokenValue", token.token());

    let cached = client
        .get_cached_access_token(&scopes(&["scope"]), &options)
        .unwrap()
        .unwrap();
    assert_eq!(token, cached);

    client.http_client().assert();
}

#[test]
fn blocking_client_sends_every_grant() {
    let http_client = TestHttpClient::new()
        .add(
            token_request()
                .assert_request_form(&[
                    ("client_id", "client-id"),
                    ("grant_type", "authorization_code"),
                    ("scope", "scope"),
                    ("code", "the-code"),
                    ("redirect_uri", "https://localhost"),
                ])
                .set_response_body(TOKEN_RESPONSE),
        )
        .add(
            token_request()
                .assert_request_form(&[
                    ("client_id", "client-id"),
                    ("grant_type", "client_credentials"),
                    ("scope", "scope"),
                    ("client_assertion", "a.b.c"),
                    ("client_assertion_type", JWT_BEARER_ASSERTION),
                ])
                .set_response_body(TOKEN_RESPONSE),
        )
        .add(
            token_request()
                .assert_request_form(&[
                    ("client_id", "client-id"),
                    ("grant_type", "client_credentials"),
                    ("scope", "scope"),
                    ("client_assertion_type", JWT_BEARER_ASSERTION),
                ])
                .assert_request_form_key("client_assertion")
                .set_response_body(TOKEN_RESPONSE),
        )
        .add(
            token_request()
                .assert_request_form(&[
                    ("client_id", "client-id"),
                    ("grant_type", "refresh_token"),
                    ("scope", "scope"),
                    ("refresh_token", "the-rt"),
                    ("client_info", "1"),
                ])
                .set_response_body(TOKEN_RESPONSE),
        )
        .add(
            token_request()
                .assert_request_form(&[
                    ("client_id", "client-id"),
                    ("grant_type", JWT_BEARER_GRANT),
                    ("scope", "scope"),
                    ("assertion", "user-assertion"),
                    ("requested_token_use", "on_behalf_of"),
                    ("client_secret", "secret"),
                ])
                .set_response_body(TOKEN_RESPONSE),
        )
        .add(
            token_request()
                .assert_request_form(&[
                    ("client_id", "client-id"),
                    ("grant_type", "refresh_token"),
                    ("scope", "scope"),
                    ("refresh_token", "obo-rt"),
                    ("client_info", "1"),
                    ("client_secret", "secret"),
                ])
                .set_response_body(TOKEN_RESPONSE),
        );

    let client = blocking_client(http_client);
    let scopes = scopes(&["scope"]);
    let options = TokenRequestOptions::default();
    let certificate = PemClientCertificate::from_pem(CERTIFICATE_PEM).unwrap();
    let credential = ClientCredential::Secret("secret".to_string());

    client
        .obtain_token_by_authorization_code(&scopes, "the-code", "https://localhost", None, &options)
        .unwrap();
    client
        .obtain_token_by_jwt_assertion(&scopes, "a.b.c", &options)
        .unwrap();
    client
        .obtain_token_by_client_certificate(&scopes, &certificate, &options)
        .unwrap();
    client
        .obtain_token_by_refresh_token(&scopes, "the-rt", &options)
        .unwrap();
    client
        .obtain_token_on_behalf_of(&scopes, &credential, "user-assertion", &options)
        .unwrap();
    client
        .obtain_token_on_behalf_of_by_refresh_token(&scopes, &credential, "obo-rt", &options)
        .unwrap();

    client.http_client().assert();
}

#[test]
fn transport_failures_are_reported_as_errors() {
    let http_client = token_request()
        .set_transport_error("connection refused")
        .build();

    let client = blocking_client(http_client);

    let err = client
        .obtain_token_by_client_secret(&scopes(&["scope"]), "secret", &TokenRequestOptions::default())
        .unwrap_err();

    assert!(err.is_error());
    assert_eq!(
        "token request failed: connection refused",
        err.error().error.message
    );
}

#[test]
fn nothing_is_sent_when_the_request_cannot_be_built() {
    let client = blocking_client(TestHttpClient::new());

    let err = client
        .obtain_token_by_client_secret(
            &scopes(&["scope"]),
            "secret",
            &TokenRequestOptions::default().tenant_id("not-allowed"),
        )
        .unwrap_err();

    assert!(err.is_authentication_error());
    assert!(client.http_client().sent().is_empty());
}

#[tokio::test]
async fn async_client_secret_grant_returns_and_caches_the_token() {
    let http_client = token_request()
        .assert_request_form(&[
            ("client_id", "client-id"),
            ("grant_type", "client_credentials"),
            ("scope", "scope"),
            ("client_secret", "secret"),
        ])
        .set_response_body(TOKEN_RESPONSE)
        .build();

    let client = async_client(http_client);
    let options = TokenRequestOptions::default();

    let token = client
        .obtain_token_by_client_secret(&scopes(&["scope"]), "secret", &options)
        .await
        .unwrap();

    assert_eq!("tokenValue", token.token());
    assert_eq!(
        Some(token),
        client
            .get_cached_access_token(&scopes(&["scope"]), &options)
            .unwrap()
    );

    client.http_client().assert();
}

#[tokio::test]
async fn async_client_handles_refresh_token_rotation() {
    let http_client = TestHttpClient::new()
        .add(
            token_request()
                .set_response_body(
                    r#"{"access_token":"at1","expires_in":3600,"refresh_token":"rt1"}"#,
                ),
        )
        .add(
            token_request()
                .assert_request_form(&[
                    ("client_id", "client-id"),
                    ("grant_type", "refresh_token"),
                    ("scope", "scope"),
                    ("refresh_token", "rt1"),
                    ("client_info", "1"),
                ])
                .set_response_body(
                    r#"{"access_token":"at2","expires_in":3600,"refresh_token":"rt2"}"#,
                ),
        );

    let client = async_client(http_client);
    let scopes = scopes(&["scope"]);
    let options = TokenRequestOptions::default();

    client
        .obtain_token_by_authorization_code(&scopes, "code", "https://localhost", None, &options)
        .await
        .unwrap();

    let refresh_tokens = client.get_cached_refresh_tokens(&scopes, &options).unwrap();
    assert_eq!(1, refresh_tokens.len());
    assert_eq!("rt1", refresh_tokens[0]["secret"]);

    let token = client
        .obtain_token_by_refresh_token(&scopes, "rt1", &options)
        .await
        .unwrap();
    assert_eq!("at2", token.token());

    let refresh_tokens = client.get_cached_refresh_tokens(&scopes, &options).unwrap();
    assert_eq!(1, refresh_tokens.len());
    assert_eq!("rt2", refresh_tokens[0]["secret"]);

    client.http_client().assert();
}

#[tokio::test]
async fn async_client_sends_on_behalf_of_with_a_certificate() {
    let http_client = token_request()
        .assert_request_form(&[
            ("client_id", "client-id"),
            ("grant_type", JWT_BEARER_GRANT),
            ("scope", "scope"),
            ("assertion", "user-assertion"),
            ("requested_token_use", "on_behalf_of"),
            ("client_assertion_type", JWT_BEARER_ASSERTION),
        ])
        .assert_request_form_key("client_assertion")
        .set_response_body(TOKEN_RESPONSE)
        .build();

    let client = async_client(http_client);
    let credential = ClientCredential::Certificate(Arc::new(
        PemClientCertificate::from_pem(CERTIFICATE_PEM).unwrap(),
    ));

    let token = client
        .obtain_token_on_behalf_of(
            &scopes(&["scope"]),
            &credential,
            "user-assertion",
            &TokenRequestOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!("tokenValue", token.token());
    client.http_client().assert();
}

#[tokio::test]
async fn async_client_surfaces_provider_errors() {
    let http_client = token_request()
        .set_response_status_code(401)
        .set_response_body(r#"{"error":"invalid_client","error_description":"bad secret"}"#)
        .build();

    let client = async_client(http_client);

    let err = client
        .obtain_token_by_client_secret(&scopes(&["scope"]), "wrong", &TokenRequestOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_authentication_error());
    assert_eq!(
        "Token endpoint error '(invalid_client) bad secret'",
        err.message()
    );
    client.http_client().assert();
}
