use tracing::debug;

use crate::{
    certificate::ClientCertificate,
    helpers::now,
    types::{
        http_client::map_transport, AccessTokenInfo, ClientCoreOptions, ClientCredential,
        HttpRequest, OidcBlockingHttpClient, OidcReturnType, TokenRequestOptions,
    },
};

use super::{ClientCore, TokenClient};

/// # BlockingClient
/// [TokenClient] that sends its requests through an [OidcBlockingHttpClient]
#[derive(Debug)]
pub struct BlockingClient<H: OidcBlockingHttpClient> {
    core: ClientCore,
    http_client: H,
}

impl<H: OidcBlockingHttpClient> BlockingClient<H> {
    /// Creates a client. See [ClientCore::new] for the arguments.
    pub fn new(
        tenant_id: &str,
        client_id: &str,
        options: ClientCoreOptions,
        http_client: H,
    ) -> OidcReturnType<Self> {
        Ok(Self::from_core(
            ClientCore::new(tenant_id, client_id, options)?,
            http_client,
        ))
    }

    /// Wraps an existing [ClientCore], e.g. one from [ClientCore::restore]
    pub fn from_core(core: ClientCore, http_client: H) -> Self {
        Self { core, http_client }
    }

    /// The transport requests are sent through
    pub fn http_client(&self) -> &H {
        &self.http_client
    }

    fn send(
        &self,
        request: OidcReturnType<HttpRequest>,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request = request?;
        let request_time = now();

        debug!(url = %request.url, grant_type = request.form_value("grant_type"), "sending token request");

        let response = map_transport(self.http_client.request(request.clone()))?;

        self.core
            .process_response(&request, response, request_time, options)
    }
}

impl<H: OidcBlockingHttpClient> TokenClient for BlockingClient<H> {
    fn core(&self) -> &ClientCore {
        &self.core
    }

    fn obtain_token_by_authorization_code(
        &self,
        scopes: &[String],
        code: &str,
        redirect_uri: &str,
        client_secret: Option<&str>,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request =
            self.core
                .get_auth_code_request(scopes, code, redirect_uri, client_secret, options);
        self.send(request, options)
    }

    fn obtain_token_by_jwt_assertion(
        &self,
        scopes: &[String],
        assertion: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request = self.core.get_jwt_assertion_request(scopes, assertion, options);
        self.send(request, options)
    }

    fn obtain_token_by_client_certificate(
        &self,
        scopes: &[String],
        certificate: &dyn ClientCertificate,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request = self
            .core
            .get_client_certificate_request(scopes, certificate, options);
        self.send(request, options)
    }

    fn obtain_token_by_client_secret(
        &self,
        scopes: &[String],
        secret: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request = self.core.get_client_secret_request(scopes, secret, options);
        self.send(request, options)
    }

    fn obtain_token_by_refresh_token(
        &self,
        scopes: &[String],
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request = self
            .core
            .get_refresh_token_request(scopes, refresh_token, options);
        self.send(request, options)
    }

    fn obtain_token_on_behalf_of(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        user_assertion: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request =
            self.core
                .get_on_behalf_of_request(scopes, client_credential, user_assertion, options);
        self.send(request, options)
    }

    fn obtain_token_on_behalf_of_by_refresh_token(
        &self,
        scopes: &[String],
        client_credential: &ClientCredential,
        refresh_token: &str,
        options: &TokenRequestOptions,
    ) -> OidcReturnType<AccessTokenInfo> {
        let request = self.core.get_refresh_token_on_behalf_of_request(
            scopes,
            client_credential,
            refresh_token,
            options,
        );
        self.send(request, options)
    }
}
