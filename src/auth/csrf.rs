use actix_session::Session;
use rand::Rng;

use crate::errors::AppError;

const CSRF_KEY: &str = "csrf_token";

/// The session's CSRF token, generated on first use.
pub fn get_or_create_token(session: &Session) -> String {
    if let Ok(Some(token)) = session.get::<String>(CSRF_KEY) {
        return token;
    }
    let token = generate_token();
    if let Err(e) = session.insert(CSRF_KEY, &token) {
        log::warn!("Could not store CSRF token: {e}");
    }
    token
}

/// Reject a form whose token does not match the session's.
pub fn validate_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    let stored = session.get::<String>(CSRF_KEY).unwrap_or(None).unwrap_or_default();
    if stored.is_empty() || !tokens_match(&stored, submitted) {
        return Err(AppError::Csrf);
    }
    Ok(())
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Constant-time comparison.
fn tokens_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn comparison_requires_exact_match() {
        assert!(tokens_match("abc", "abc"));
        assert!(!tokens_match("abc", "abd"));
        assert!(!tokens_match("abc", "abcd"));
    }
}
