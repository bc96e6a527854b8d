/// Authentication and identity
///
/// # Modules
///
/// - [`claims`]: Request-scoped claim map, audience and issuer checks
/// - [`jwks`]: Signing key resolution from the issuer's published key set
/// - [`validator`]: RS256 bearer token validation
/// - [`identity`]: Email claim to user ID resolution
/// - [`middleware`]: Axum middleware attaching validated claims to requests
/// - [`error`]: Authentication error type
///
/// # Request Flow
///
/// ```text
/// Authorization: Bearer <jwt>
///   └─> middleware::require_bearer_token
///         └─> TokenValidator::validate ─> KeyResolver::resolve
///               └─> Claims in request extensions
///                     └─> IdentityResolver::resolve ─> user ID
/// ```

pub mod claims;
pub mod error;
pub mod identity;
pub mod jwks;
pub mod middleware;
pub mod validator;

pub use claims::Claims;
pub use error::AuthError;
