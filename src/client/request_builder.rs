use std::collections::HashMap;

use crate::{
    certificate::{sign_client_assertion, ClientCertificate},
    claims::{merge_claims_challenge_and_capabilities, CAE_CAPABILITY},
    helpers::join_scopes,
    types::{
        ClientCredential, HttpMethod, HttpRequest, OidcReturnType, TokenRequestOptions,
    },
};

use super::ClientCore;

/// `client_assertion_type` of JWT client assertions
pub const JWT_BEARER_ASSERTION: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// `grant_type` of the on-behalf-of flow
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

impl ClientCore {
    /// Authorization code grant
    pub fn get_auth_code_request(
        &self,
        scopes: &[String],
        code: &str,
        redirect_uri: &str,
        client_secret: Option<&str>,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let mut data = self.base_form("authorization_code", scopes);
        data.insert("code".to_string(), code.to_string());
        data.insert("redirect_uri".to_string(), redirect_uri.to_string());

        self.insert_claims(&mut data, options)?;

        if let Some(secret) = client_secret.filter(|s| !s.is_empty()) {
            data.insert("client_secret".to_string(), secret.to_string());
        }

        self.post(data, options)
    }

    /// Client credentials grant authenticated with a ready made client assertion
    pub fn get_jwt_assertion_request(
        &self,
        scopes: &[String],
        assertion: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let mut data = self.base_form("client_credentials", scopes);
        data.insert("client_assertion".to_string(), assertion.to_string());
        data.insert(
            "client_assertion_type".to_string(),
            JWT_BEARER_ASSERTION.to_string(),
        );

        self.insert_claims(&mut data, options)?;

        self.post(data, options)
    }

    /// Signs a client assertion for the token endpoint of the request
    pub fn get_client_certificate_assertion(
        &self,
        certificate: &dyn ClientCertificate,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<String> {
        let audience = self.get_token_url(options)?;

        sign_client_assertion(
            certificate,
            audience.as_str(),
            &self.client_id,
            self.is_adfs,
        )
    }

    /// Client credentials grant authenticated with a certificate
    pub fn get_client_certificate_request(
        &self,
        scopes: &[String],
        certificate: &dyn ClientCertificate,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let assertion = self.get_client_certificate_assertion(certificate, options)?;
        self.get_jwt_assertion_request(scopes, &assertion, options)
    }

    /// Client credentials grant authenticated with a secret
    pub fn get_client_secret_request(
        &self,
        scopes: &[String],
        secret: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let mut data = self.base_form("client_credentials", scopes);
        data.insert("client_secret".to_string(), secret.to_string());

        self.insert_claims(&mut data, options)?;

        self.post(data, options)
    }

    /// Refresh token grant. `client_info=1` asks the provider for the account's identifiers.
    pub fn get_refresh_token_request(
        &self,
        scopes: &[String],
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let mut data = self.refresh_token_form(scopes, refresh_token);

        if let Some(secret) = options.client_secret.as_deref().filter(|s| !s.is_empty()) {
            data.insert("client_secret".to_string(), secret.to_string());
        }

        self.insert_claims(&mut data, options)?;

        self.post(data, options)
    }

    /// On-behalf-of grant exchanging `user_assertion`
    pub fn get_on_behalf_of_request(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        user_assertion: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let mut data = self.base_form(JWT_BEARER_GRANT, scopes);
        data.insert("assertion".to_string(), user_assertion.to_string());
        data.insert(
            "requested_token_use".to_string(),
            "on_behalf_of".to_string(),
        );

        self.insert_claims(&mut data, options)?;
        self.insert_client_credential(&mut data, client_credential, options)?;

        self.post(data, options)
    }

    /// On-behalf-of renewal with a refresh token obtained from an earlier exchange
    pub fn get_refresh_token_on_behalf_of_request(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let mut data = self.refresh_token_form(scopes, refresh_token);

        self.insert_claims(&mut data, options)?;
        self.insert_client_credential(&mut data, client_credential, options)?;

        self.post(data, options)
    }

    fn base_form(&self, grant_type: &str, scopes: &[String]) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("client_id".to_string(), self.client_id.clone());
        data.insert("grant_type".to_string(), grant_type.to_string());
        data.insert("scope".to_string(), join_scopes(scopes));
        data
    }

    fn refresh_token_form(&self, scopes: &[String], refresh_token: &str) -> HashMap<String, String> {
        let mut data = self.base_form("refresh_token", scopes);
        data.insert("refresh_token".to_string(), refresh_token.to_string());
        data.insert("client_info".to_string(), "1".to_string());
        data
    }

    fn insert_claims(
        &self,
        data: &mut HashMap<String, String>,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<()> {
        let capabilities: &[&str] = if options.enable_cae {
            &[CAE_CAPABILITY]
        } else {
            &[]
        };

        let claims =
            merge_claims_challenge_and_capabilities(capabilities, options.claims.as_deref())?;

        if let Some(claims) = claims.filter(|c| !c.is_empty()) {
            data.insert("claims".to_string(), claims);
        }

        Ok(())
    }

    fn insert_client_credential(
        &self,
        data: &mut HashMap<String, String>,
        client_credential: &ClientCredential,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<()> {
        match client_credential {
            ClientCredential::Certificate(certificate) => {
                let assertion =
                    self.get_client_certificate_assertion(certificate.as_ref(), options)?;
                data.insert("client_assertion".to_string(), assertion);
                data.insert(
                    "client_assertion_type".to_string(),
                    JWT_BEARER_ASSERTION.to_string(),
                );
            }
            ClientCredential::AssertionProvider(provider) => {
                data.insert("client_assertion".to_string(), provider());
                data.insert(
                    "client_assertion_type".to_string(),
                    JWT_BEARER_ASSERTION.to_string(),
                );
            }
            ClientCredential::Secret(secret) => {
                data.insert("client_secret".to_string(), secret.clone());
            }
        }

        Ok(())
    }

    fn post(
        &self,
        data: HashMap<String, String>,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<HttpRequest> {
        let url = self.get_token_url(options)?;

        Ok(HttpRequest::new(url)
            .method(HttpMethod::POST)
            .header("accept", "application/json")
            .form(data))
    }
}

#[cfg(test)]
#[path = "../tests/client/request_builder_tests.rs"]
mod request_builder_tests;
