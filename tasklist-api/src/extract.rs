/// Request extractors
///
/// [`CurrentUser`] turns the claims attached by the bearer middleware into a
/// user ID. Task handlers take it as an argument, so identity is resolved once
/// per request and the ID is passed down to the store.

use crate::{app::AppState, error::ApiError};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tasklist_shared::auth::Claims;
use uuid::Uuid;

/// The authenticated caller's user ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Absent only when a route is mounted outside require_bearer_token
        let claims = parts.extensions.get::<Claims>().cloned().ok_or_else(|| {
            ApiError::InternalError("No validated claims on request".to_string())
        })?;

        let user_id = state.identity.resolve(state.store.as_ref(), &claims).await?;

        Ok(CurrentUser(user_id))
    }
}
