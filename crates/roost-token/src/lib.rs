//! # roost-token
//!
//! Signed node-token issuance for the Roost control server.
//!
//! Remote worker nodes authenticate their calls back into the control plane
//! with compact, HMAC-signed tokens minted here. This crate provides
//! functionality for:
//! - Building token requests with custom claims, an expiry, and a subject
//! - Deriving stable token ids from caller correlation strings
//! - Signing tokens with a node's symmetric secret (HS256/HS384/HS512)
//!
//! ## Claim Layout
//!
//! | Claim | Location | Source |
//! |-------|----------|--------|
//! | `iss` | payload | configured origin |
//! | `aud` | payload | node connection address |
//! | `jti` | payload + header | digest of the identified-by string |
//! | `iat`, `nbf` | payload | one clock read (`nbf` = `iat` - 5 minutes) |
//! | `exp` | payload | request expiry, when set |
//! | `sub` | payload + header | request subject, when non-empty |
//! | `unique_id` | payload | 16 fresh random bytes, hex-rendered |
//!
//! `jti` and `sub` are written to both the header and the payload so
//! verifiers that read either location agree. Request claims land in the
//! payload after the standard fields and override same-named ones;
//! `unique_id` is written last and always fresh.

pub mod error;
pub mod hash;
pub mod request;
pub mod signer;
pub mod token;

pub use error::TokenError;
pub use hash::HashAlgorithm;
pub use request::TokenRequest;
pub use roost_core::identity::{NodeIdentity, SigningSecret};
pub use signer::{HmacSha256Signer, HmacSha384Signer, HmacSha512Signer, Signer, signer_for};
pub use token::{IssuedToken, TokenIssuer};
