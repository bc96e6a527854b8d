//! Common test utilities for the auth integration tests
//!
//! - RSA fixtures: two key pairs with self-signed certificates
//! - Key set documents in the issuer's `{keys: [{kid, x5c}]}` shape
//! - A wiremock server publishing a key set
//! - Token signing

#![allow(dead_code)]

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const ISSUER: &str = "https://issuer.example.com/";
pub const AUDIENCE: &str = "https://tasks.example.com/";
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

pub const PRIMARY_KEY: &str = include_str!("../fixtures/primary.key.pem");
pub const PRIMARY_CERT: &str = include_str!("../fixtures/primary.cert.pem");
pub const ROTATED_KEY: &str = include_str!("../fixtures/rotated.key.pem");
pub const ROTATED_CERT: &str = include_str!("../fixtures/rotated.cert.pem");

/// Base64 DER body of a PEM certificate, as published in `x5c`
pub fn x5c(cert_pem: &str) -> String {
    cert_pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect()
}

/// Key set document from `(kid, certificate)` pairs
pub fn key_set(keys: &[(&str, &str)]) -> Value {
    let keys: Vec<Value> = keys
        .iter()
        .map(|(kid, cert)| json!({"kid": kid, "kty": "RSA", "use": "sig", "x5c": [x5c(cert)]}))
        .collect();
    json!({ "keys": keys })
}

/// Starts a server publishing `body` at [`JWKS_PATH`]
pub async fn jwks_server(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

pub fn jwks_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), JWKS_PATH)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims accepted by a validator configured with [`ISSUER`] and [`AUDIENCE`]
pub fn valid_claims() -> Value {
    json!({
        "sub": "auth0|123",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
    })
}

/// Signs `claims` with RS256
pub fn sign(key_pem: &str, kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(key_pem.as_bytes()).expect("fixture key");
    encode(&header, claims, &key).expect("sign token")
}
