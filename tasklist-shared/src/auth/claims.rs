/// Validated token claims
///
/// [`Claims`] is a generic claim map. The middleware inserts it into the
/// request's extensions after validation, and handlers read it from there for
/// the rest of that request only.
///
/// # Audience
///
/// The `aud` claim may be a single string or an array of strings:
///
/// - single string: must equal the expected audience exactly
/// - array: the expected audience must appear somewhere in it; order,
///   duplicates, and other entries are ignored

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::AuthError;

/// Shape of the `aud` claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// `"aud": "https://api.example.com/"`
    One(String),

    /// `"aud": ["https://api.example.com/", "https://issuer.example.com/userinfo"]`
    Many(Vec<String>),
}

impl Audience {
    /// Whether `expected` is accepted by this audience claim
    pub fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::One(aud) => aud == expected,
            Audience::Many(auds) => auds.iter().any(|aud| aud == expected),
        }
    }
}

/// Claim set of a token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Raw claim value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Claim value if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// `iss` claim
    pub fn issuer(&self) -> Option<&str> {
        self.get_str("iss")
    }

    /// `aud` claim, None if absent or not a string / array of strings
    pub fn audience(&self) -> Option<Audience> {
        self.0
            .get("aud")
            .and_then(|aud| Audience::deserialize(aud).ok())
    }

    /// Checks `expected` against the `aud` claim
    pub fn check_audience(&self, expected: &str) -> Result<(), AuthError> {
        match self.audience() {
            Some(aud) if aud.contains(expected) => Ok(()),
            _ => Err(AuthError::InvalidAudience),
        }
    }

    /// Checks the `iss` claim equals `expected` exactly
    pub fn check_issuer(&self, expected: &str) -> Result<(), AuthError> {
        match self.issuer() {
            Some(iss) if iss == expected => Ok(()),
            _ => Err(AuthError::InvalidIssuer),
        }
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
