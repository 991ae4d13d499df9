//! Identity types for nodes that receive signed tokens.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Decrypted symmetric signing secret for a single node.
///
/// The wrapper keeps the key bytes out of `Debug` output and wipes them from
/// memory on drop. Secrets must not be shared across unrelated nodes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wraps already-decrypted key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret({} bytes)", self.0.len())
    }
}

impl From<&str> for SigningSecret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<&[u8]> for SigningSecret {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for SigningSecret {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

/// Identity record for a node, as supplied by the caller's node storage.
///
/// Carries the stable connection address (bound into tokens as the audience)
/// and the node's decrypted signing secret.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    address: String,
    secret: SigningSecret,
}

impl NodeIdentity {
    pub fn new(address: impl Into<String>, secret: impl Into<SigningSecret>) -> Self {
        Self {
            address: address.into(),
            secret: secret.into(),
        }
    }

    /// Stable network address used as the token audience.
    pub fn connection_address(&self) -> &str {
        &self.address
    }

    /// Decrypted signing secret. Never logged or persisted by the issuer.
    pub fn signing_secret(&self) -> &SigningSecret {
        &self.secret
    }
}
