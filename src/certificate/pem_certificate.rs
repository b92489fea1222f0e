use base64::{engine::general_purpose, Engine};
use josekit::{
    jwk::{alg::rsa::RsaKeyPair, Jwk, KeyPair},
    jws::{
        alg::{rsassa::RsassaJwsAlgorithm, rsassa_pss::RsassaPssJwsAlgorithm},
        JwsSigner,
    },
};
use lazy_static::lazy_static;
use regex::Regex;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::types::{OidcClientError, OidcReturnType};

use super::ClientCertificate;

lazy_static! {
    static ref CERTIFICATE_REGEX: Regex =
        Regex::new(r"-----BEGIN CERTIFICATE-----([A-Za-z0-9+/=\s]+)-----END CERTIFICATE-----")
            .unwrap();
    static ref PRIVATE_KEY_REGEX: Regex = Regex::new(
        r"-----BEGIN (RSA )?PRIVATE KEY-----[A-Za-z0-9+/=\s]+-----END (RSA )?PRIVATE KEY-----"
    )
    .unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// # PemClientCertificate
/// Certificate loaded from a PEM bundle containing an RSA private key and the certificate.
/// The thumbprints are computed over the first certificate of the bundle.
pub struct PemClientCertificate {
    private_key: Jwk,
    thumbprint: String,
    sha256_thumbprint: String,
}

impl std::fmt::Debug for PemClientCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PemClientCertificate")
            .field("thumbprint", &self.thumbprint)
            .field("sha256_thumbprint", &self.sha256_thumbprint)
            .finish_non_exhaustive()
    }
}

impl PemClientCertificate {
    /// Loads the certificate from PEM text. Both PKCS#1 and PKCS#8 RSA keys are accepted.
    pub fn from_pem(pem: impl AsRef<[u8]>) -> OidcReturnType<Self> {
        let pem = std::str::from_utf8(pem.as_ref()).map_err(|_| {
            Box::new(OidcClientError::new_type_error(
                "certificate PEM is not valid UTF-8",
                None,
            ))
        })?;

        let certificate = CERTIFICATE_REGEX
            .captures(pem)
            .and_then(|c| c.get(1))
            .ok_or(Box::new(OidcClientError::new_type_error(
                "no certificate found in the PEM data",
                None,
            )))?;

        let der = general_purpose::STANDARD
            .decode(WHITESPACE_REGEX.replace_all(certificate.as_str(), "").as_bytes())
            .map_err(|_| {
                Box::new(OidcClientError::new_type_error(
                    "certificate in the PEM data is not base64 encoded",
                    None,
                ))
            })?;

        let key = PRIVATE_KEY_REGEX
            .find(pem)
            .ok_or(Box::new(OidcClientError::new_type_error(
                "no RSA private key found in the PEM data",
                None,
            )))?;

        let key_pair = RsaKeyPair::from_pem(key.as_str()).map_err(|_| {
            Box::new(OidcClientError::new_type_error(
                "private key in the PEM data is not a valid RSA key",
                None,
            ))
        })?;

        Ok(Self {
            private_key: key_pair.to_jwk_key_pair(),
            thumbprint: base64_url::encode(&Sha1::digest(&der)),
            sha256_thumbprint: base64_url::encode(&Sha256::digest(&der)),
        })
    }

    fn signer_error() -> Box<OidcClientError> {
        Box::new(OidcClientError::new_error(
            "error when creating a jws signer",
            None,
        ))
    }

    fn signing_error() -> Box<OidcClientError> {
        Box::new(OidcClientError::new_error(
            "error while signing the client assertion",
            None,
        ))
    }
}

impl ClientCertificate for PemClientCertificate {
    fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    fn sha256_thumbprint(&self) -> &str {
        &self.sha256_thumbprint
    }

    fn sign_ps256(&self, data: &[u8]) -> OidcReturnType<Vec<u8>> {
        let signer = RsassaPssJwsAlgorithm::Ps256
            .signer_from_jwk(&self.private_key)
            .map_err(|_| Self::signer_error())?;

        signer.sign(data).map_err(|_| Self::signing_error())
    }

    fn sign_rs256(&self, data: &[u8]) -> OidcReturnType<Vec<u8>> {
        let signer = RsassaJwsAlgorithm::Rs256
            .signer_from_jwk(&self.private_key)
            .map_err(|_| Self::signer_error())?;

        signer.sign(data).map_err(|_| Self::signing_error())
    }
}

#[cfg(test)]
#[path = "../tests/certificate_tests.rs"]
mod certificate_tests;
