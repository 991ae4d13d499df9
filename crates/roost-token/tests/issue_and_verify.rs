//! End-to-end issuance checked with an independent JWT implementation.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use serde_json::{Value, json};

use roost_core::config::TokenConfig;
use roost_token::{HashAlgorithm, NodeIdentity, TokenIssuer, TokenRequest};

const ORIGIN: &str = "https://panel.example.com";
const ADDRESS: &str = "node-1.example.com:8443";
const SECRET: &str = "0123456789abcdef0123456789abcdef";

#[derive(Debug, Deserialize)]
struct NodeClaims {
    iss: String,
    aud: String,
    jti: String,
    iat: i64,
    nbf: i64,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    sub: Option<String>,
    unique_id: String,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

fn issuer() -> TokenIssuer {
    TokenIssuer::new(&TokenConfig::new(ORIGIN)).unwrap()
}

fn issuer_for(signing_algorithm: &str) -> TokenIssuer {
    TokenIssuer::new(&TokenConfig {
        issuer: ORIGIN.to_string(),
        signing_algorithm: signing_algorithm.to_string(),
    })
    .unwrap()
}

fn node() -> NodeIdentity {
    NodeIdentity::new(ADDRESS, SECRET)
}

fn decoding_key() -> DecodingKey {
    DecodingKey::from_secret(SECRET.as_bytes())
}

/// Validation that accepts tokens without an expiry, which are valid
/// indefinitely (subject to `nbf`).
fn open_ended_validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.set_audience(&[ADDRESS]);
    validation.set_issuer(&[ORIGIN]);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation
}

#[test]
fn test_token_decodes_with_standard_validator() {
    let token = issuer()
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new(),
        )
        .unwrap();

    let data = decode::<NodeClaims>(
        token.as_str(),
        &decoding_key(),
        &open_ended_validation(Algorithm::HS256),
    )
    .unwrap();

    assert_eq!(data.claims.iss, ORIGIN);
    assert_eq!(data.claims.aud, ADDRESS);
    assert_eq!(
        data.claims.jti,
        "92e76c732d82ec49fb40ff0bb444430c52f63577fe1a055ea119693241b2d291"
    );
    assert_eq!(data.claims.nbf, data.claims.iat - 300);
    assert_eq!(data.claims.exp, None);
    assert_eq!(data.claims.sub, None);
    assert_eq!(data.claims.unique_id.len(), 32);
    assert!(
        data.claims
            .unique_id
            .chars()
            .all(|c| c.is_ascii_hexdigit())
    );
}

#[test]
fn test_hs384_token_verifies_with_standard_validator() {
    let token = issuer_for("HS384")
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new(),
        )
        .unwrap();

    let header = decode_header(token.as_str()).unwrap();
    assert_eq!(header.alg, Algorithm::HS384);

    let data = decode::<NodeClaims>(
        token.as_str(),
        &decoding_key(),
        &open_ended_validation(Algorithm::HS384),
    )
    .unwrap();
    assert_eq!(data.claims.aud, ADDRESS);
    assert_eq!(data.claims.nbf, data.claims.iat - 300);
}

#[test]
fn test_hs512_token_verifies_with_standard_validator() {
    let token = issuer_for("HS512")
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new(),
        )
        .unwrap();

    let header = decode_header(token.as_str()).unwrap();
    assert_eq!(header.alg, Algorithm::HS512);

    let data = decode::<NodeClaims>(
        token.as_str(),
        &decoding_key(),
        &open_ended_validation(Algorithm::HS512),
    )
    .unwrap();
    assert_eq!(data.claims.aud, ADDRESS);
    assert_eq!(data.claims.nbf, data.claims.iat - 300);
}

#[test]
fn test_expiring_token_passes_expiry_validation() {
    let expires_at = Utc::now() + Duration::hours(1);
    let token = issuer()
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new().expires_at(expires_at),
        )
        .unwrap();

    // Default validation requires and checks `exp`.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[ADDRESS]);
    validation.set_issuer(&[ORIGIN]);

    let data = decode::<NodeClaims>(token.as_str(), &decoding_key(), &validation).unwrap();
    assert_eq!(data.claims.exp, Some(expires_at.timestamp()));
}

#[test]
fn test_subject_and_custom_claims_roundtrip() {
    let claims = HashMap::from([
        ("fleet".to_string(), json!("eu-1")),
        ("limits".to_string(), json!({"cpu": 4})),
    ]);
    let token = issuer()
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new().subject("remote-control").claims(claims),
        )
        .unwrap();

    let data = decode::<NodeClaims>(
        token.as_str(),
        &decoding_key(),
        &open_ended_validation(Algorithm::HS256),
    )
    .unwrap();

    assert_eq!(data.claims.sub.as_deref(), Some("remote-control"));
    assert_eq!(data.claims.extra.get("fleet"), Some(&json!("eu-1")));
    assert_eq!(data.claims.extra.get("limits"), Some(&json!({"cpu": 4})));
}

#[test]
fn test_header_extras_are_tolerated_by_other_implementations() {
    let token = issuer()
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new().subject("remote-control"),
        )
        .unwrap();

    // The header carries `jti` and `sub` beyond the registered fields; a
    // standard decoder must still parse it.
    let header = decode_header(token.as_str()).unwrap();
    assert_eq!(header.alg, Algorithm::HS256);
    assert_eq!(header.typ.as_deref(), Some("JWT"));
}

#[test]
fn test_tampered_payload_is_rejected() {
    let token = issuer()
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new(),
        )
        .unwrap();

    let mut parts: Vec<String> = token.as_str().split('.').map(String::from).collect();
    parts[1].replace_range(0..1, "f");
    let tampered = parts.join(".");

    let err = decode::<NodeClaims>(
        &tampered,
        &decoding_key(),
        &open_ended_validation(Algorithm::HS256),
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
}

#[test]
fn test_other_secret_is_rejected() {
    let token = issuer()
        .issue(
            &node(),
            "session-42",
            HashAlgorithm::default(),
            TokenRequest::new(),
        )
        .unwrap();

    let other_key = DecodingKey::from_secret(b"an-entirely-different-secret-key");
    let err = decode::<NodeClaims>(
        token.as_str(),
        &other_key,
        &open_ended_validation(Algorithm::HS256),
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
}

#[test]
fn test_two_issuances_verify_independently() {
    let request = TokenRequest::new();
    let first = issuer()
        .issue(&node(), "session-42", HashAlgorithm::default(), request.clone())
        .unwrap();
    let second = issuer()
        .issue(&node(), "session-42", HashAlgorithm::default(), request)
        .unwrap();

    let validation = open_ended_validation(Algorithm::HS256);
    let first_data = decode::<NodeClaims>(first.as_str(), &decoding_key(), &validation).unwrap();
    let second_data = decode::<NodeClaims>(second.as_str(), &decoding_key(), &validation).unwrap();

    assert_eq!(first_data.claims.jti, second_data.claims.jti);
    assert_ne!(first_data.claims.unique_id, second_data.claims.unique_id);
}
