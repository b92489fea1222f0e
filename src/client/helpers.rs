use tracing::info;

use crate::types::{OidcClientError, OidcReturnType};

/// Authority used when none is configured
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Trims the authority, drops a trailing `/` and makes sure it is an `https` URL.
/// A bare host gets `https://` prepended.
pub fn normalize_authority(authority: &str) -> OidcReturnType<String> {
    let authority = authority.trim().trim_end_matches('/');

    if authority.starts_with("https://") {
        return Ok(authority.to_string());
    }

    if authority.contains("://") {
        return Err(Box::new(OidcClientError::new_type_error(
            &format!(
                "'{authority}' is an invalid authority. The value must be a TLS protected (https) URL."
            ),
            None,
        )));
    }

    Ok(format!("https://{authority}"))
}

/// Tenant ids may only contain ASCII alphanumerics, `-` and `.`
pub fn validate_tenant_id(tenant_id: &str) -> OidcReturnType<()> {
    let valid = !tenant_id.is_empty()
        && tenant_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

    if !valid {
        return Err(Box::new(OidcClientError::new_type_error(
            "Invalid tenant id provided. You can locate your tenant id by following the instructions listed here: https://learn.microsoft.com/partner-center/find-ids-and-domain-names",
            None,
        )));
    }

    Ok(())
}

/// Picks the tenant a request goes to.
///
/// The configured tenant is used unless another one is requested. A requested tenant must be
/// a valid tenant id. It is ignored for ADFS and when multitenant authentication is disabled,
/// and must otherwise be listed in `additionally_allowed_tenants` (or the list must contain
/// `*`).
pub(crate) fn resolve_tenant(
    default_tenant: &str,
    tenant_id: Option<&str>,
    additionally_allowed_tenants: &[String],
    disable_multitenant_auth: bool,
) -> OidcReturnType<String> {
    let requested = match tenant_id {
        Some(t) if t != default_tenant => t,
        _ => return Ok(default_tenant.to_string()),
    };

    validate_tenant_id(requested)?;

    if default_tenant.eq_ignore_ascii_case("adfs") || disable_multitenant_auth {
        info!(
            configured_tenant = default_tenant,
            requested_tenant = requested,
            "a token was requested for a different tenant than the configured one, \
             but the configured tenant was used since multitenant authentication is disabled"
        );
        return Ok(default_tenant.to_string());
    }

    if default_tenant.is_empty() {
        return Ok(requested.to_string());
    }

    if additionally_allowed_tenants
        .iter()
        .any(|t| t == "*" || t == requested)
    {
        info!(
            configured_tenant = default_tenant,
            requested_tenant = requested,
            "a token was requested for a different tenant than the configured one, \
             and the requested tenant was used"
        );
        return Ok(requested.to_string());
    }

    Err(Box::new(OidcClientError::new_authentication_error(
        &format!(
            "The current credential is not configured to acquire tokens for tenant {requested}. \
             To enable acquiring tokens for this tenant add it to the additionally_allowed_tenants \
             when creating the credential, or add \"*\" to additionally_allowed_tenants to allow \
             acquiring tokens for any tenant."
        ),
        None,
        None,
        None,
    )))
}

#[cfg(test)]
#[path = "../tests/client/helpers_tests.rs"]
mod helpers_tests;
