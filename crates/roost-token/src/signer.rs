//! MAC signers for the token's header and payload bytes.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use roost_core::identity::SigningSecret;

use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// MAC primitive bound to a named JOSE algorithm.
///
/// The issuer writes [`algorithm`](Signer::algorithm) into the token header
/// so a verifier can select the matching primitive. Implementations fail on
/// unusable keys instead of falling back to another algorithm.
pub trait Signer: Send + Sync + fmt::Debug {
    /// JOSE identifier written into the `alg` header field.
    fn algorithm(&self) -> &'static str;

    /// MAC over the signing input (the `header.payload` bytes).
    fn sign(&self, message: &[u8], key: &SigningSecret) -> Result<Vec<u8>, TokenError>;

    /// Whether `signature` is the MAC of `message` under `key`.
    /// The comparison runs in constant time.
    fn verify(
        &self,
        message: &[u8],
        key: &SigningSecret,
        signature: &[u8],
    ) -> Result<bool, TokenError>;
}

/// Resolves a configured JOSE algorithm name to a signer.
///
/// Names are matched exactly; unknown ones fail so that a misconfigured
/// issuer can never silently substitute a different algorithm.
pub fn signer_for(name: &str) -> Result<Box<dyn Signer>, TokenError> {
    match name {
        "HS256" => Ok(Box::new(HmacSha256Signer)),
        "HS384" => Ok(Box::new(HmacSha384Signer)),
        "HS512" => Ok(Box::new(HmacSha512Signer)),
        _ => Err(TokenError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// HMAC-SHA-256 (`HS256`).
#[derive(Debug)]
pub struct HmacSha256Signer;

impl Signer for HmacSha256Signer {
    fn algorithm(&self) -> &'static str {
        "HS256"
    }

    fn sign(&self, message: &[u8], key: &SigningSecret) -> Result<Vec<u8>, TokenError> {
        let mut mac = hs256(key)?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(
        &self,
        message: &[u8],
        key: &SigningSecret,
        signature: &[u8],
    ) -> Result<bool, TokenError> {
        let mut mac = hs256(key)?;
        mac.update(message);
        Ok(mac.verify_slice(signature).is_ok())
    }
}

/// HMAC-SHA-384 (`HS384`).
#[derive(Debug)]
pub struct HmacSha384Signer;

impl Signer for HmacSha384Signer {
    fn algorithm(&self) -> &'static str {
        "HS384"
    }

    fn sign(&self, message: &[u8], key: &SigningSecret) -> Result<Vec<u8>, TokenError> {
        let mut mac = hs384(key)?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(
        &self,
        message: &[u8],
        key: &SigningSecret,
        signature: &[u8],
    ) -> Result<bool, TokenError> {
        let mut mac = hs384(key)?;
        mac.update(message);
        Ok(mac.verify_slice(signature).is_ok())
    }
}

/// HMAC-SHA-512 (`HS512`).
#[derive(Debug)]
pub struct HmacSha512Signer;

impl Signer for HmacSha512Signer {
    fn algorithm(&self) -> &'static str {
        "HS512"
    }

    fn sign(&self, message: &[u8], key: &SigningSecret) -> Result<Vec<u8>, TokenError> {
        let mut mac = hs512(key)?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(
        &self,
        message: &[u8],
        key: &SigningSecret,
        signature: &[u8],
    ) -> Result<bool, TokenError> {
        let mut mac = hs512(key)?;
        mac.update(message);
        Ok(mac.verify_slice(signature).is_ok())
    }
}

fn hs256(key: &SigningSecret) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(checked_key(key)?)
        .map_err(|e| TokenError::InvalidSigningKey(e.to_string()))
}

fn hs384(key: &SigningSecret) -> Result<HmacSha384, TokenError> {
    HmacSha384::new_from_slice(checked_key(key)?)
        .map_err(|e| TokenError::InvalidSigningKey(e.to_string()))
}

fn hs512(key: &SigningSecret) -> Result<HmacSha512, TokenError> {
    HmacSha512::new_from_slice(checked_key(key)?)
        .map_err(|e| TokenError::InvalidSigningKey(e.to_string()))
}

// HMAC itself accepts keys of any length, so emptiness is the one malformed
// shape that must be caught here.
fn checked_key(key: &SigningSecret) -> Result<&[u8], TokenError> {
    if key.is_empty() {
        return Err(TokenError::InvalidSigningKey(
            "signing secret is empty".to_string(),
        ));
    }
    Ok(key.as_bytes())
}
