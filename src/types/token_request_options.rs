/// # TokenRequestOptions
/// Per call options of every token operation. `Default` gives the plain request:
/// no CAE, no claims challenge, the client's own tenant.
#[derive(Debug, Default, Clone)]
pub struct TokenRequestOptions {
    /// Request a token that supports Continuous Access Evaluation.
    /// Uses the CAE cache and adds the `CP1` client capability to the claims.
    pub enable_cae: bool,
    /// Claims challenge JSON returned by a resource, sent back as `claims`
    pub claims: Option<String>,
    /// Tenant to request the token from instead of the configured one.
    /// Must be allowed by the client's additionally allowed tenants.
    pub tenant_id: Option<String>,
    /// Client secret sent with refresh token grants
    pub client_secret: Option<String>,
}

impl TokenRequestOptions {
    /// Sets `enable_cae`
    pub fn enable_cae(mut self, enable_cae: bool) -> Self {
        self.enable_cae = enable_cae;
        self
    }

    /// Sets the claims challenge
    pub fn claims(mut self, claims: impl Into<String>) -> Self {
        self.claims = Some(claims.into());
        self
    }

    /// Sets the tenant for this request
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Sets the client secret used by refresh token grants
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }
}
