/// Signing key resolution
///
/// The token issuer publishes its public keys as a JSON key set:
///
/// ```json
/// {"keys": [{"kid": "abc123", "kty": "RSA", "x5c": ["MIIDDTCCAfWgAwIBAgIJ..."]}]}
/// ```
///
/// [`JwksKeyResolver`] fetches that document, scans it for the token's `kid`,
/// and wraps the first `x5c` certificate in PEM armor to build the public key.
/// Records without `x5c` fall back to the RSA modulus/exponent (`n`/`e`).
///
/// # Caching
///
/// By default every resolution fetches the key set again. A cache TTL can be
/// set with [`JwksKeyResolver::with_cache_ttl`]; when a cached set has no key
/// for the requested `kid`, the set is refetched once so rotated keys are
/// picked up before the TTL runs out.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tasklist_shared::auth::jwks::{JwksKeyResolver, KeyResolver};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = JwksKeyResolver::new(
///     "https://issuer.example.com/.well-known/jwks.json",
///     Duration::from_secs(10),
/// )?
/// .with_cache_ttl(Duration::from_secs(300));
///
/// let key = resolver.resolve("abc123").await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::error::AuthError;

/// Published key set document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JwkSet {
    /// Key records in publication order
    pub keys: Vec<Jwk>,
}

/// One key record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jwk {
    /// Key identifier matched against the token header
    #[serde(default)]
    pub kid: Option<String>,

    /// Key type, "RSA" for every key we accept
    #[serde(default)]
    pub kty: Option<String>,

    /// Intended use ("sig")
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,

    /// Base64 DER certificate chain; the first entry holds the signing key
    #[serde(default)]
    pub x5c: Vec<String>,

    /// RSA modulus (base64url)
    #[serde(default)]
    pub n: Option<String>,

    /// RSA exponent (base64url)
    #[serde(default)]
    pub e: Option<String>,
}

impl JwkSet {
    /// First key whose `kid` equals `kid`
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

impl Jwk {
    /// Builds the RSA public key for signature verification
    pub fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        if let Some(cert) = self.x5c.first() {
            return DecodingKey::from_rsa_pem(pem_from_x5c(cert).as_bytes())
                .map_err(|e| AuthError::InvalidKey(format!("bad x5c certificate: {e}")));
        }

        match (&self.n, &self.e) {
            (Some(n), Some(e)) => DecodingKey::from_rsa_components(n, e)
                .map_err(|e| AuthError::InvalidKey(format!("bad RSA components: {e}"))),
            _ => Err(AuthError::InvalidKey(
                "key record has neither x5c nor n/e".to_string(),
            )),
        }
    }
}

/// Wraps a base64 DER certificate in PEM armor
///
/// The body is split into 64-character lines.
pub fn pem_from_x5c(cert: &str) -> String {
    let body: String = cert.chars().filter(|c| !c.is_whitespace()).collect();

    let mut pem = String::with_capacity(body.len() + body.len() / 64 + 64);
    pem.push_str("-----BEGIN CERTIFICATE-----\n");
    for line in body.as_bytes().chunks(64) {
        // base64 is ASCII, so byte chunks are valid UTF-8
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");
    pem
}

/// Looks up the public key that signed a token
#[async_trait]
pub trait KeyResolver: Send + Sync {
    /// Returns the key for `kid` or `AuthError::KeyNotFound`
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError>;
}

struct CacheEntry {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Resolves keys from the issuer's published key set over HTTPS
#[derive(Clone)]
pub struct JwksKeyResolver {
    jwks_url: String,
    client: reqwest::Client,
    cache_ttl: Option<Duration>,
    cache: Arc<RwLock<Option<CacheEntry>>>,
}

impl JwksKeyResolver {
    /// Creates a resolver that fetches on every lookup
    ///
    /// `fetch_timeout` bounds each outbound request.
    pub fn new(jwks_url: impl Into<String>, fetch_timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| AuthError::KeyFetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            client,
            cache_ttl: None,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Keeps fetched key sets for `ttl`; a zero TTL disables caching
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Key set URL
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Downloads and decodes the key set
    pub async fn fetch_key_set(&self) -> Result<JwkSet, AuthError> {
        debug!(url = %self.jwks_url, "Fetching signing key set");

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "HTTP {} from key set endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("invalid key set document: {e}")))
    }

    async fn cached_key_set(&self) -> Option<JwkSet> {
        let ttl = self.cache_ttl?;
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < ttl)
            .map(|entry| entry.keys.clone())
    }

    async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let keys = self.fetch_key_set().await?;

        if self.cache_ttl.is_some() {
            *self.cache.write().await = Some(CacheEntry {
                keys: keys.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(keys)
    }
}

#[async_trait]
impl KeyResolver for JwksKeyResolver {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(keys) = self.cached_key_set().await {
            if let Some(jwk) = keys.find(kid) {
                return jwk.decoding_key();
            }
            debug!(kid, "Key not in cached set, refetching");
        }

        let keys = self.refresh().await?;
        match keys.find(kid) {
            Some(jwk) => jwk.decoding_key(),
            None => {
                warn!(kid, available = keys.keys.len(), "No signing key matches token kid");
                Err(AuthError::KeyNotFound {
                    kid: kid.to_string(),
                })
            }
        }
    }
}
