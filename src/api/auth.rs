//! Authentication API
//!
//! Endpoints:
//! - POST /api/auth/login - Log in (auto-creates the account on first use)
//!
//! Also home of the [`Authenticated`] extractor protected routes use.

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::services::AuthError;
use crate::types::{AuthenticatedUser, LoginRequest, LoginResponse};
use crate::AppState;

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// POST /api/auth/login
///
/// Verify credentials (or auto-create a demo account) and issue a session
/// token.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let response = state.auth.login(&request)?;
    Ok(Json(response))
}

/// Authenticated user extractor.
///
/// Accepts the session token either as an `Authorization: Bearer` header
/// or as a `user_token` query parameter (the upload/summary clients pass
/// the latter).
pub struct Authenticated {
    pub user: AuthenticatedUser,
}

#[derive(Deserialize, Default)]
struct TokenQuery {
    user_token: Option<String>,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn query_token(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    serde_urlencoded::from_str::<TokenQuery>(query)
        .unwrap_or_default()
        .user_token
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| query_token(parts))
            .ok_or(AuthError::Unauthorized)?;

        let user = state
            .auth
            .resolve_token(&token)
            .ok_or(AuthError::Unauthorized)?;

        Ok(Authenticated {
            user: AuthenticatedUser::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_query_parsing() {
        let parsed: TokenQuery = serde_urlencoded::from_str("user_token=abc&x=1").unwrap();
        assert_eq!(parsed.user_token.as_deref(), Some("abc"));

        let empty: TokenQuery = serde_urlencoded::from_str("x=1").unwrap_or_default();
        assert!(empty.user_token.is_none());
    }
}
