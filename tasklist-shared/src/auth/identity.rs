/// Identity resolution
///
/// Maps a validated token to a durable user ID. The identity provider puts
/// the user's email under a namespaced custom claim (for example
/// `https://tasks.example.com/email`); the claim key is configuration.
///
/// Resolution is one round trip: the user store upserts by email and returns
/// the ID. Handlers resolve once per request and pass the ID down.

use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::store::UserStore;

/// Error type for identity resolution
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Identity claim absent or not a string
    #[error("Token is missing the {0} claim")]
    MissingClaim(String),

    /// User upsert failed
    #[error("Failed to resolve user: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Resolves token claims to user IDs
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    claim_key: String,
}

impl IdentityResolver {
    /// Creates a resolver reading the email from `claim_key`
    pub fn new(claim_key: impl Into<String>) -> Self {
        Self {
            claim_key: claim_key.into(),
        }
    }

    /// Claim key holding the email
    pub fn claim_key(&self) -> &str {
        &self.claim_key
    }

    /// Extracts the email claim
    pub fn email<'a>(&self, claims: &'a Claims) -> Result<&'a str, IdentityError> {
        claims
            .get_str(&self.claim_key)
            .ok_or_else(|| IdentityError::MissingClaim(self.claim_key.clone()))
    }

    /// Returns the user ID for the token's email, creating the user on first sight
    pub async fn resolve<S>(&self, store: &S, claims: &Claims) -> Result<Uuid, IdentityError>
    where
        S: UserStore + ?Sized,
    {
        let email = self.email(claims)?;
        let user_id = store.upsert_user(email).await?;

        debug!(user_id = %user_id, "Resolved request identity");
        Ok(user_id)
    }
}
