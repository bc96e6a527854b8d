/// Bearer token middleware for Axum
///
/// Every task route sits behind [`require_bearer_token`]. It reads
/// `Authorization: Bearer <token>`, validates the token, and inserts the
/// resulting [`Claims`] into the request's extensions. Claims never outlive
/// the request they came with.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Extension, Router};
/// use tasklist_shared::auth::{claims::Claims, middleware::require_bearer_token, validator::TokenValidator};
///
/// async fn whoami(Extension(claims): Extension<Claims>) -> String {
///     format!("{:?}", claims.issuer())
/// }
///
/// fn router(validator: Arc<TokenValidator>) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn_with_state(validator, require_bearer_token))
/// }
/// ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::{error::AuthError, validator::TokenValidator};

/// Extracts the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Authorization header is not ASCII".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Rejects requests without a valid bearer token
///
/// # Errors
///
/// - 401 if the header is missing or the token fails validation
/// - 400 if the header is not a Bearer credential
pub async fn require_bearer_token(
    State(validator): State<Arc<TokenValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;

    let claims = validator.validate(token).await.map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        e
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
