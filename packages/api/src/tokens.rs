//! Opaque random tokens for email verification, password reset and generated
//! passwords.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};

use crate::error::ApiError;

/// Generate a url-safe random token from `n_bytes` of OS randomness.
pub fn new_token(n_bytes: usize) -> Result<String, ApiError> {
    let mut buf = vec![0u8; n_bytes];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| ApiError::internal(format!("Failed to generate random bytes: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe() {
        let token = new_token(16).expect("token generation failed");
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn tokens_do_not_repeat() {
        let a = new_token(16).expect("token generation failed");
        let b = new_token(16).expect("token generation failed");
        assert_ne!(a, b);
    }

    #[test]
    fn token_length_tracks_entropy() {
        // 16 bytes -> 22 base64url chars, 10 bytes -> 14
        assert_eq!(new_token(16).unwrap().len(), 22);
        assert_eq!(new_token(10).unwrap().len(), 14);
    }
}
