/// Authentication errors
///
/// Every variant is a per-request failure. An unknown key ID or an unreachable
/// key issuer rejects the offending request and nothing else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error type for bearer-token authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header present but not `Bearer <token>`
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token could not be decoded at all
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Token header carries no `kid`
    #[error("Token header has no key identifier")]
    MissingKeyId,

    /// Expected audience not present in the `aud` claim
    #[error("Invalid audience")]
    InvalidAudience,

    /// `iss` claim does not equal the expected issuer
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Key set has no key for the token's `kid`
    #[error("Unable to find appropriate key for kid {kid}")]
    KeyNotFound { kid: String },

    /// Key set could not be fetched or decoded
    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// Matching key record could not be turned into a public key
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Signature, algorithm, or expiry check failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidFormat(_) => "invalid_format",
            AuthError::MalformedToken(_) => "malformed_token",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::KeyNotFound { .. } => "key_not_found",
            AuthError::KeyFetch(_) => "key_fetch_failed",
            AuthError::InvalidKey(_) => "invalid_key",
            AuthError::InvalidToken(_) => "invalid_token",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error_code(),
            "message": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}
