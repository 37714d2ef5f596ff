//! Third-party identity provider: sign-in, token refresh, sign-out,
//! password-reset email.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpIdentityProvider;

/// Seconds before expiry at which an ID token is treated as stale.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Tokens issued to a signed-in user. Stored in the cookie session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: i64,
}

impl IdentitySession {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at - EXPIRY_SKEW_SECS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityError {
    InvalidCredentials,
    UserDisabled,
    TooManyAttempts,
    SessionExpired,
    /// Any other provider error code.
    Provider(String),
    Transport(String),
}

impl IdentityError {
    /// Map a provider error code (`{"error": {"message": CODE}}`).
    pub fn from_code(code: &str) -> Self {
        // codes may carry a trailing " : explanation"
        let code = code.split(" : ").next().unwrap_or(code).trim();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
                IdentityError::InvalidCredentials
            }
            "USER_DISABLED" => IdentityError::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityError::TooManyAttempts,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => IdentityError::SessionExpired,
            other => IdentityError::Provider(other.to_string()),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            IdentityError::InvalidCredentials => "Invalid email or password".to_string(),
            IdentityError::UserDisabled => "This account has been disabled".to_string(),
            IdentityError::TooManyAttempts => "Too many attempts. Please try again later.".to_string(),
            IdentityError::SessionExpired => "Your session has expired. Please sign in again.".to_string(),
            IdentityError::Provider(_) | IdentityError::Transport(_) => {
                "The sign-in service is unavailable. Please try again.".to_string()
            }
        }
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::InvalidCredentials => write!(f, "Invalid credentials"),
            IdentityError::UserDisabled => write!(f, "User disabled"),
            IdentityError::TooManyAttempts => write!(f, "Too many attempts"),
            IdentityError::SessionExpired => write!(f, "Session expired"),
            IdentityError::Provider(code) => write!(f, "Identity provider error: {code}"),
            IdentityError::Transport(e) => write!(f, "Identity provider unreachable: {e}"),
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, IdentityError>;

    /// Exchange the refresh token for a fresh ID token.
    async fn refresh(&self, session: &IdentitySession) -> Result<IdentitySession, IdentityError>;

    async fn sign_out(&self, session: &IdentitySession) -> Result<(), IdentityError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_map_to_variants() {
        assert_eq!(IdentityError::from_code("INVALID_PASSWORD"), IdentityError::InvalidCredentials);
        assert_eq!(
            IdentityError::from_code("TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled"),
            IdentityError::TooManyAttempts
        );
        assert_eq!(IdentityError::from_code("TOKEN_EXPIRED"), IdentityError::SessionExpired);
        assert_eq!(IdentityError::from_code("QUOTA"), IdentityError::Provider("QUOTA".into()));
    }

    #[test]
    fn expiry_has_a_safety_margin() {
        let s = IdentitySession {
            uid: "u".into(),
            email: "e".into(),
            id_token: "t".into(),
            refresh_token: "r".into(),
            expires_at: 1_000,
        };
        assert!(!s.is_expired(900));
        assert!(s.is_expired(950));
        assert!(s.is_expired(1_000));
    }
}
