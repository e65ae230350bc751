//! Authentication Service
//!
//! Email/password login with opaque session tokens. Accounts are
//! auto-created on first login. Passwords are stored as SHA-256 hex
//! digests; authentication here is demo-grade session plumbing, not the
//! interesting part of this backend.
//!
//! Storage:
//! - SQLite: user rows including the current session token
//! - DashMap: in-memory token -> user cache for request-path lookups

use crate::services::SqliteStore;
use crate::types::{LoginRequest, LoginResponse, User};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Authentication errors surfaced to clients.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid user token")]
    Unauthorized,

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Authentication service for login and session-token resolution.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<SqliteStore>,
    /// Active sessions (token -> user).
    sessions: Arc<DashMap<String, User>>,
}

impl AuthService {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self {
            store,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Log a user in, auto-creating the account on first sight of the
    /// email. Issues a fresh session token either way.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = match self.store.get_user_by_email(&request.email) {
            Some(existing) => {
                if let Some(ref digest) = existing.password_digest {
                    if *digest != password_digest(&request.password) {
                        warn!("Rejected login for {}", request.email);
                        return Err(AuthError::InvalidCredentials);
                    }
                }
                existing
            }
            None => {
                let user = User {
                    id: uuid::Uuid::new_v4().to_string(),
                    email: request.email.clone(),
                    // Local part of the email doubles as the display name.
                    name: request.email.split('@').next().map(str::to_string),
                    role: "trader".to_string(),
                    password_digest: Some(password_digest(&request.password)),
                    session_token: None,
                    created_at: chrono::Utc::now().timestamp_millis(),
                };
                self.store.create_user(&user)?;
                info!("Auto-created account for {}", user.email);
                user
            }
        };

        let token = uuid::Uuid::new_v4().to_string();
        self.store.set_session_token(&user.id, &token)?;

        let mut session_user = user.clone();
        session_user.session_token = Some(token.clone());
        self.sessions.insert(token.clone(), session_user);
        debug!("Issued session token for {}", user.email);

        Ok(LoginResponse {
            token,
            role: user.role,
            email: user.email,
        })
    }

    /// Resolve a session token (or raw user id) to a user. `None` means
    /// the caller gets a 401.
    pub fn resolve_token(&self, token: &str) -> Option<User> {
        if let Some(user) = self.sessions.get(token) {
            return Some(user.clone());
        }

        // Cache miss: fall through to the store, which also accepts the
        // user id in place of a token.
        let user = self.store.get_user_by_token(token)?;
        self.sessions.insert(token.to_string(), user.clone());
        Some(user)
    }

    /// Number of cached sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// SHA-256 hex digest of a password.
fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(Arc::new(SqliteStore::new_in_memory().unwrap()))
    }

    #[test]
    fn test_login_auto_creates_account() {
        let auth = service();
        let response = auth
            .login(&LoginRequest {
                email: "trader@example.com".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();

        assert_eq!(response.email, "trader@example.com");
        assert_eq!(response.role, "trader");
        assert!(!response.token.is_empty());

        let user = auth.resolve_token(&response.token).unwrap();
        assert_eq!(user.name.as_deref(), Some("trader"));
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let auth = service();
        let request = LoginRequest {
            email: "trader@example.com".to_string(),
            password: "pw".to_string(),
        };
        auth.login(&request).unwrap();

        let wrong = LoginRequest {
            password: "other".to_string(),
            ..request
        };
        assert!(matches!(
            auth.login(&wrong),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_relogin_rotates_token() {
        let auth = service();
        let request = LoginRequest {
            email: "trader@example.com".to_string(),
            password: "pw".to_string(),
        };
        let first = auth.login(&request).unwrap();
        let second = auth.login(&request).unwrap();

        assert_ne!(first.token, second.token);
        // Latest token resolves via the store.
        assert!(auth.resolve_token(&second.token).is_some());
    }

    #[test]
    fn test_resolve_unknown_token() {
        let auth = service();
        assert!(auth.resolve_token("nope").is_none());
    }

    #[test]
    fn test_password_digest_is_stable_hex() {
        let a = password_digest("secret");
        let b = password_digest("secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, password_digest("other"));
    }
}
