//! # Certificate Module
//! Client certificates and the JWT client assertions signed with them

mod assertion;
mod pem_certificate;

use std::fmt::Debug;

use crate::types::OidcReturnType;

pub use assertion::{sign_client_assertion, ASSERTION_LIFETIME_SECS};
pub use pem_certificate::PemClientCertificate;

/// # ClientCertificate
/// A certificate the client authenticates with.
pub trait ClientCertificate: Debug + Send + Sync {
    /// SHA-1 thumbprint of the DER encoded certificate, base64url encoded
    fn thumbprint(&self) -> &str;

    /// SHA-256 thumbprint of the DER encoded certificate, base64url encoded
    fn sha256_thumbprint(&self) -> &str;

    /// Signs `data` with RSASSA-PSS using SHA-256
    fn sign_ps256(&self, data: &[u8]) -> OidcReturnType<Vec<u8>>;

    /// Signs `data` with RSASSA-PKCS1-v1_5 using SHA-256
    fn sign_rs256(&self, data: &[u8]) -> OidcReturnType<Vec<u8>>;
}
