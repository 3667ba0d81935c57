//! # Caller Extractor
//!
//! Resolves `Authorization: Bearer <access token>` into the active user
//! making the request. Handlers that take a `Caller` are authenticated;
//! handlers that don't are public.

use crate::handlers::{shop_error_to_response, ApiError};
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use shop_core::{ShopError, ShopResult, User};
use tracing::warn;

/// The authenticated user behind a request
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
}

impl Caller {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// Pull the bearer token out of the headers.
///
/// No header, or a header for another scheme, means no credentials were
/// offered. A `Bearer` header that isn't exactly one token is invalid.
fn bearer_token(headers: &HeaderMap) -> ShopResult<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(ShopError::NotAuthenticated)?
        .to_str()
        .map_err(|_| ShopError::InvalidToken)?;

    let mut parts = header.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
        _ => return Err(ShopError::NotAuthenticated),
    }

    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(token),
        _ => Err(ShopError::InvalidToken),
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> ShopResult<Caller> {
    let token = bearer_token(headers)?;
    let user_id = state.tokens.verify_access(token)?;

    // A deleted or deactivated account invalidates its outstanding tokens
    let user = state
        .store
        .user_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or(ShopError::InvalidToken)?;

    Ok(Caller { user })
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(caller) = parts.extensions.get::<Caller>() {
            return Ok(caller.clone());
        }

        match authenticate(state, &parts.headers).await {
            Ok(caller) => {
                parts.extensions.insert(caller.clone());
                Ok(caller)
            }
            Err(err) => {
                if matches!(err, ShopError::InvalidToken) {
                    warn!(uri = %parts.uri, "Rejected bearer token");
                }
                Err(shop_error_to_response(err))
            }
        }
    }
}
