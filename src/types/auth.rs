//! Authentication Types
//!
//! Email/password login with opaque session tokens. Accounts are
//! auto-created on first login (demo behavior carried over from the
//! product requirements).

use serde::{Deserialize, Serialize};

/// Login request from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque session token for subsequent requests.
    pub token: String,
    /// User role ("trader" or "admin").
    pub role: String,
    pub email: String,
}

/// User account stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user id.
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// "trader" (default) or "admin".
    pub role: String,
    /// SHA-256 hex digest of the password; never serialized.
    #[serde(skip)]
    pub password_digest: Option<String>,
    /// Current session token, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// When the account was created (ms since epoch).
    pub created_at: i64,
}

/// Authenticated user extracted from a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_digest_never_serialized() {
        let user = User {
            id: "u1".to_string(),
            email: "trader@example.com".to_string(),
            name: Some("trader".to_string()),
            role: "trader".to_string(),
            password_digest: Some("deadbeef".to_string()),
            session_token: Some("tok".to_string()),
            created_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_login_request_deserialization() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.c","password":"pw"}"#).unwrap();
        assert_eq!(req.email, "a@b.c");
        assert_eq!(req.password, "pw");
    }
}
