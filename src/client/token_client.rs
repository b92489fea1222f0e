use std::future::Future;

use crate::{
    cache::CacheEntry,
    certificate::ClientCertificate,
    types::{AccessTokenInfo, ClientCredential, OidcReturnType, TokenRequestOptions},
};

use super::ClientCore;

/// # TokenClient
/// Token operations that block the calling thread while the request is in flight.
///
/// Every operation builds its request with [ClientCore], sends it and hands the response to
/// [ClientCore::process_response]. Errors are returned as is; nothing is retried.
pub trait TokenClient {
    /// The shared client state
    fn core(&self) -> &ClientCore;

    /// Redeems an authorization code
    fn obtain_token_by_authorization_code(
        &self,
        scopes: &[String],
        code: &str,
        redirect_uri: &str,
        client_secret: Option<&str>,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo>;

    /// Client credentials grant with a client assertion
    fn obtain_token_by_jwt_assertion(
        &self,
        scopes: &[String],
        assertion: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo>;

    /// Client credentials grant with a certificate
    fn obtain_token_by_client_certificate(
        &self,
        scopes: &[String],
        certificate: &dyn ClientCertificate,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo>;

    /// Client credentials grant with a secret
    fn obtain_token_by_client_secret(
        &self,
        scopes: &[String],
        secret: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo>;

    /// Refresh token grant
    fn obtain_token_by_refresh_token(
        &self,
        scopes: &[String],
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo>;

    /// On-behalf-of exchange of a user assertion
    fn obtain_token_on_behalf_of(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        user_assertion: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo>;

    /// On-behalf-of renewal with a refresh token
    fn obtain_token_on_behalf_of_by_refresh_token(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo>;

    /// Cached access token that is still valid. No request is made.
    fn get_cached_access_token(
        &self,
        scopes: &[String],
        options: &TokenRequestOptions,
    ) -> OidcReturnType<Option<AccessTokenInfo>> {
        self.core().find_valid_access_token(scopes, options)
    }

    /// Cached refresh tokens. No request is made.
    fn get_cached_refresh_tokens(
        &self,
        scopes: &[String],
        options: &TokenRequestOptions,
    ) -> OidcReturnType<Vec<CacheEntry>> {
        self.core().list_refresh_tokens(scopes, options)
    }
}

/// # AsyncTokenClient
/// Non blocking counterpart of [TokenClient]
pub trait AsyncTokenClient {
    /// The shared client state
    fn core(&self) -> &ClientCore;

    /// Redeems an authorization code
    fn obtain_token_by_authorization_code(
        &self,
        scopes: &[String],
        code: &str,
        redirect_uri: &str,
        client_secret: Option<&str>,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = OidcReturnType<AccessTokenInfo>> + Send;

    /// Client credentials grant with a client assertion
    fn obtain_token_by_jwt_assertion(
        &self,
        scopes: &[String],
        assertion: &str,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = OidcReturnType<AccessTokenInfo>> + Send;

    /// Client credentials grant with a certificate
    fn obtain_token_by_client_certificate(
        &self,
        scopes: &[String],
        certificate: &dyn ClientCertificate,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = OidcReturnType<AccessTokenInfo>> + Send;

    /// Client credentials grant with a secret
    fn obtain_token_by_client_secret(
        &self,
        scopes: &[String],
        secret: &str,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = OidcReturnType<AccessTokenInfo>> + Send;

    /// Refresh token grant
    fn obtain_token_by_refresh_token(
        &self,
        scopes: &[String],
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = OidcReturnType<AccessTokenInfo>> + Send;

    /// On-behalf-of exchange of a user assertion
    fn obtain_token_on_behalf_of(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        user_assertion: &str,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = OidcReturnType<AccessTokenInfo>> + Send;

    /// On-behalf-of renewal with a refresh token
    fn obtain_token_on_behalf_of_by_refresh_token(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = OidcReturnType<AccessTokenInfo>> + Send;

    /// Cached access token that is still valid. No request is made.
    fn get_cached_access_token(
        &self,
        scopes: &[String],
        options: &TokenRequestOptions,
    ) -> OidcReturnType<Option<AccessTokenInfo>> {
        self.core().find_valid_access_token(scopes, options)
    }

    /// Cached refresh tokens. No request is made.
    fn get_cached_refresh_tokens(
        &self,
        scopes: &[String],
        options: &TokenRequestOptions,
    ) -> OidcReturnType<Vec<CacheEntry>> {
        self.core().list_refresh_tokens(scopes, options)
    }
}
