use std::{fmt::Debug, sync::Arc};

use crate::certificate::ClientCertificate;

/// Produces a client assertion each time it is called
pub type AssertionProvider = Arc<dyn Fn() -> String + Send + Sync>;

/// # ClientCredential
/// How the client authenticates itself in an on-behalf-of request
#[derive(Clone)]
pub enum ClientCredential {
    /// Shared secret, sent as `client_secret`
    Secret(String),
    /// Certificate, used to sign a fresh client assertion
    Certificate(Arc<dyn ClientCertificate>),
    /// Callback returning a ready made client assertion
    AssertionProvider(AssertionProvider),
}

impl Debug for ClientCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secret(_) => f.write_str("Secret(***)"),
            Self::Certificate(c) => f.debug_tuple("Certificate").field(c).finish(),
            Self::AssertionProvider(_) => f.write_str("AssertionProvider"),
        }
    }
}
