//! Token assembly and issuance.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde_json::{Map, Value, json};

use roost_core::config::TokenConfig;
use roost_core::identity::NodeIdentity;

use crate::error::TokenError;
use crate::hash::HashAlgorithm;
use crate::request::TokenRequest;
use crate::signer::{Signer, signer_for};

/// Clock-skew grace subtracted from `iat` to form `nbf`, in seconds.
const NOT_BEFORE_GRACE_SECS: i64 = 5 * 60;

/// Random bytes behind each `unique_id` claim.
const UNIQUE_ID_BYTES: usize = 16;

/// Secrets shorter than 256 bits trigger a warning.
const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Issues signed node tokens using settings fixed at construction.
///
/// The issuer holds no mutable state; a single instance can serve any number
/// of threads concurrently.
#[derive(Debug)]
pub struct TokenIssuer {
    origin: String,
    signer: Box<dyn Signer>,
}

impl TokenIssuer {
    /// Builds an issuer from injected configuration.
    ///
    /// Fails with [`TokenError::UnsupportedAlgorithm`] when the configured
    /// signing algorithm is not implemented; there is no fallback.
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        Ok(Self {
            origin: config.issuer.clone(),
            signer: signer_for(&config.signing_algorithm)?,
        })
    }

    /// Issues one signed token for `identity`.
    ///
    /// `identified_by` is the caller's correlation string (a session or
    /// connection identifier); the token id (`jti`) is its `algorithm`
    /// digest, so the raw string never appears in the token. The request is
    /// consumed; clone it to issue from the same configuration again.
    ///
    /// Reading the operating system entropy source can block briefly on
    /// some platforms right after boot.
    pub fn issue(
        &self,
        identity: &NodeIdentity,
        identified_by: &str,
        algorithm: HashAlgorithm,
        request: TokenRequest,
    ) -> Result<IssuedToken, TokenError> {
        if identity.connection_address().is_empty() {
            return Err(TokenError::EmptyAudience);
        }
        if identified_by.is_empty() {
            return Err(TokenError::EmptyCorrelation);
        }

        let secret = identity.signing_secret();
        if !secret.is_empty() && secret.len() < RECOMMENDED_SECRET_BYTES {
            tracing::warn!(
                secret_bytes = secret.len(),
                audience = %identity.connection_address(),
                "signing secret is shorter than the recommended 256 bits"
            );
        }

        let token_id = algorithm.digest_hex(identified_by);
        let issued_at = Utc::now();
        let iat = issued_at.timestamp();

        // Standard fields first; request claims are copied in afterwards so
        // a deliberate override (e.g. a custom `iss`) wins. `unique_id` goes
        // last and can never be overridden.
        let mut payload = Map::new();
        payload.insert("iss".to_string(), json!(self.origin));
        payload.insert("aud".to_string(), json!(identity.connection_address()));
        payload.insert("jti".to_string(), json!(token_id));
        payload.insert("iat".to_string(), json!(iat));
        payload.insert("nbf".to_string(), json!(iat - NOT_BEFORE_GRACE_SECS));
        if let Some(expires_at) = request.expires_at {
            payload.insert("exp".to_string(), json!(expires_at.timestamp()));
        }

        // The header duplicates `jti` and `sub` for verifiers that read
        // either location.
        let mut header = Map::new();
        header.insert("typ".to_string(), json!("JWT"));
        header.insert("alg".to_string(), json!(self.signer.algorithm()));
        header.insert("jti".to_string(), json!(token_id));
        match &request.subject {
            Some(subject) if !subject.is_empty() => {
                payload.insert("sub".to_string(), json!(subject));
                header.insert("sub".to_string(), json!(subject));
            }
            _ => {}
        }

        for (name, value) in request.claims {
            payload.insert(name, value);
        }
        payload.insert("unique_id".to_string(), json!(random_unique_id()?));

        let signing_input = format!(
            "{}.{}",
            encode_segment(serde_json::to_string(&header)?.as_bytes()),
            encode_segment(serde_json::to_string(&payload)?.as_bytes()),
        );
        let signature = self.signer.sign(signing_input.as_bytes(), secret)?;
        let compact = format!("{}.{}", signing_input, encode_segment(&signature));

        tracing::debug!(
            audience = %identity.connection_address(),
            token_id = %token_id,
            algorithm = self.signer.algorithm(),
            "issued node token"
        );

        Ok(IssuedToken {
            compact,
            token_id,
            issued_at,
            claims: payload,
        })
    }
}

/// A signed, immutable token in compact three-segment form.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    compact: String,
    token_id: String,
    issued_at: DateTime<Utc>,
    claims: Map<String, Value>,
}

impl IssuedToken {
    /// Compact `header.payload.signature` representation.
    pub fn as_str(&self) -> &str {
        &self.compact
    }

    /// Consumes the token, returning the compact representation.
    pub fn into_string(self) -> String {
        self.compact
    }

    /// Token id (`jti`) derived from the identified-by string.
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    /// Instant the issuer read the clock for `iat`.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Final payload claims, with any caller overrides applied.
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

impl fmt::Display for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact)
    }
}

/// 16 fresh random bytes, hex-rendered; distinct for every issued token.
fn random_unique_id() -> Result<String, TokenError> {
    let mut bytes = [0u8; UNIQUE_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::RandomnessUnavailable(e.to_string()))?;
    Ok(hex::encode(bytes))
}

fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
