/// Bearer token validation
///
/// Tokens are RS256-signed JWTs issued by an external identity provider.
/// [`TokenValidator::validate`] runs these checks in order and stops at the
/// first failure:
///
/// 1. Decode the header (for `kid`) and the claim set, without trusting the
///    signature yet
/// 2. Audience: exact match for a string `aud`, membership for an array
/// 3. Issuer: exact match
/// 4. Resolve the signing key for `kid`
/// 5. Verify the signature with RS256 only, plus expiry
///
/// On success the full claim map is returned for the caller to attach to the
/// request.
///
/// # Example
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
/// use tasklist_shared::auth::{jwks::JwksKeyResolver, validator::TokenValidator};
///
/// # async fn example(token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = JwksKeyResolver::new(
///     "https://issuer.example.com/.well-known/jwks.json",
///     Duration::from_secs(10),
/// )?;
/// let validator = TokenValidator::new(
///     Arc::new(resolver),
///     "https://issuer.example.com/",
///     "https://tasks.example.com/",
/// );
///
/// let claims = validator.validate(token).await?;
/// println!("issuer: {:?}", claims.issuer());
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, Validation};
use tracing::debug;

use super::{claims::Claims, error::AuthError, jwks::KeyResolver};

/// The only accepted signing algorithm
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Default clock skew tolerance for `exp` in seconds
pub const DEFAULT_LEEWAY_SECONDS: u64 = 60;

/// Validates bearer tokens against one issuer and audience
#[derive(Clone)]
pub struct TokenValidator {
    resolver: Arc<dyn KeyResolver>,
    issuer: String,
    audience: String,
    leeway_seconds: u64,
}

impl TokenValidator {
    /// Creates a validator
    ///
    /// # Arguments
    ///
    /// * `resolver` - Source of signing keys
    /// * `issuer` - Expected `iss`, compared exactly
    /// * `audience` - Expected `aud` entry
    pub fn new(
        resolver: Arc<dyn KeyResolver>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
        }
    }

    /// Overrides the clock skew tolerance
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Expected issuer
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Expected audience
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Validates `token` and returns its claims
    ///
    /// # Errors
    ///
    /// - `MalformedToken` if the token cannot be decoded
    /// - `InvalidAudience` / `InvalidIssuer` for claim mismatches
    /// - `MissingKeyId`, `KeyNotFound`, `KeyFetch`, `InvalidKey` from key resolution
    /// - `InvalidToken` for a bad signature, wrong algorithm, or expired token
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(AuthError::InvalidToken(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }
        let unverified = peek_claims(token)?;

        unverified.check_audience(&self.audience)?;
        unverified.check_issuer(&self.issuer)?;

        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.resolver.resolve(&kid).await?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = self.leeway_seconds;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
            debug!(kid = %kid, error = %e, "Token signature verification failed");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::InvalidToken("token has expired".into()),
                ErrorKind::InvalidSignature => AuthError::InvalidToken("invalid signature".into()),
                ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidToken("unexpected signing algorithm".into())
                }
                ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }
}

/// Decodes the claim set without checking the signature
fn peek_claims(token: &str) -> Result<Claims, AuthError> {
    jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
        .map(|data| data.claims)
        .map_err(|e| AuthError::MalformedToken(e.to_string()))
}
