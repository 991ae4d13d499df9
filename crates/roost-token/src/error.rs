//! Error types for token issuance.

use thiserror::Error;

/// Errors that can occur while issuing a token.
///
/// Every variant is terminal for the single issuance attempt: nothing is
/// retried internally and no partial token is ever returned. The caller
/// decides whether retrying makes sense for the kind at hand.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The identity's signing secret is empty or was rejected by the MAC.
    /// Points at a data problem in the caller's identity record, not a
    /// transient fault.
    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),

    /// A digest or signing algorithm name this crate does not implement.
    /// Issuance never falls back to a different algorithm.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A header or payload value could not be serialized to JSON.
    #[error("failed to serialize token data: {0}")]
    SerializationFailure(#[from] serde_json::Error),

    /// The operating system's secure random source failed.
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// The identity carries an empty connection address.
    #[error("identity has an empty connection address")]
    EmptyAudience,

    /// The identified-by correlation string is empty.
    #[error("identified-by correlation value is empty")]
    EmptyCorrelation,
}
