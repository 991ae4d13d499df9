//! Token issuance configuration.

use serde::{Deserialize, Serialize};

/// Settings injected into a token issuer at construction.
///
/// Host applications embed this in their own configuration; the crate itself
/// reads no files and no environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Origin written into the `iss` claim of every issued token, typically
    /// the control server's public base URL.
    pub issuer: String,

    /// JOSE name of the MAC algorithm used to sign tokens.
    #[serde(default = "default_signing_algorithm")]
    pub signing_algorithm: String,
}

impl TokenConfig {
    /// Config for the given origin with the default signing algorithm.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            signing_algorithm: default_signing_algorithm(),
        }
    }
}

fn default_signing_algorithm() -> String {
    "HS256".to_string()
}
