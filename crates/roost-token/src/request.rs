//! Builder for the caller-controlled parts of a token.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Accumulates custom claims, an optional expiry, and an optional subject
/// before issuance.
///
/// A request carries no cryptographic material and is cheap to construct.
/// [`TokenIssuer::issue`](crate::TokenIssuer::issue) consumes it; clone the
/// request to issue from the same configuration again.
#[derive(Debug, Clone, Default)]
pub struct TokenRequest {
    pub(crate) claims: HashMap<String, Value>,
    pub(crate) expires_at: Option<DateTime<Utc>>,
    pub(crate) subject: Option<String>,
}

impl TokenRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the full custom-claim set (not a merge).
    ///
    /// Entries are copied into the payload verbatim, after the standard
    /// fields, so a claim named like a standard field (`iss`, `aud`, ...)
    /// overrides it. Callers own that choice.
    pub fn claims(mut self, claims: HashMap<String, Value>) -> Self {
        self.claims = claims;
        self
    }

    /// Sets or overwrites the absolute expiry emitted as `exp`.
    ///
    /// Without an expiry the token carries no `exp` claim at all, and a
    /// verifier will treat it as valid indefinitely (subject to `nbf`).
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets or overwrites the subject emitted as `sub` in both the payload
    /// and the header. An empty string leaves the token without a subject
    /// claim, same as never calling this.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}
