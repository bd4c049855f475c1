//! Session JWT module for login token issuance and verification.
//!
//! The backend is its own issuer: login hands out an access/refresh pair and
//! every request is verified against the same symmetric secret.
//!
//! IMPORTANT: the secret must be injected at deploy time via environment
//! variable to support horizontal scaling. All API instances must share it.
//!
//! Environment variables:
//! - `SESSION_JWT_SECRET`: signing secret (base64 or raw bytes)

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Environment variable holding the signing secret
pub const SESSION_SECRET_ENV: &str = "SESSION_JWT_SECRET";

const ISSUER: &str = "interntrack";

/// Token type - determines what the token can be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token sent as the Bearer credential on API requests
    Access,
    /// Long-lived token redeemable for a fresh access token
    Refresh,
}

impl TokenType {
    /// Get the audience string for this token type
    pub fn audience(&self) -> &'static str {
        match self {
            TokenType::Access => "interntrack-access",
            TokenType::Refresh => "interntrack-refresh",
        }
    }

    /// Get the default TTL in seconds for this token type
    pub fn default_ttl_seconds(&self) -> i64 {
        match self {
            TokenType::Access => 60 * 60,           // 1 hour
            TokenType::Refresh => 7 * 24 * 60 * 60, // 7 days
        }
    }
}

/// Lazily loaded secret for signing and verifying JWTs. Accepts a
/// base64-encoded value and falls back to the raw bytes.
static SECRET: LazyLock<Option<Vec<u8>>> = LazyLock::new(|| {
    std::env::var(SESSION_SECRET_ENV)
        .ok()
        .map(|value| STANDARD.decode(&value).unwrap_or_else(|_| value.into_bytes()))
});

/// Error type for session JWT operations
#[derive(Debug)]
pub enum SessionJwtError {
    MissingSecret,
    EncodingError(String),
    DecodingError(String),
    TokenTypeMismatch { expected: TokenType, got: TokenType },
}

impl std::fmt::Display for SessionJwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionJwtError::MissingSecret => write!(
                f,
                "Session signing secret not configured (missing {} env var)",
                SESSION_SECRET_ENV
            ),
            SessionJwtError::EncodingError(msg) => write!(f, "Failed to encode JWT: {}", msg),
            SessionJwtError::DecodingError(msg) => write!(f, "Failed to decode JWT: {}", msg),
            SessionJwtError::TokenTypeMismatch { expected, got } => {
                write!(
                    f,
                    "Token type mismatch: expected {:?}, got {:?}",
                    expected, got
                )
            }
        }
    }
}

impl std::error::Error for SessionJwtError {}

/// Check if session JWT signing is available
pub fn is_configured() -> bool {
    SECRET.is_some()
}

/// Claims contained in a session JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the user id
    pub sub: String,
    /// The user's email at issuance time
    pub email: String,
    /// The user's role at issuance time
    pub role: String,
    /// Token type - access or refresh
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// An access/refresh pair returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Standard JWT time claims
pub struct TimeClaims {
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Generate standard time claims for a token
pub fn make_time_claims(token_type: TokenType, ttl_override: Option<i64>) -> TimeClaims {
    let iat = chrono::Utc::now().timestamp();
    let ttl = ttl_override.unwrap_or_else(|| token_type.default_ttl_seconds());
    TimeClaims {
        iat,
        nbf: iat - 30, // 30 second clock skew allowance
        exp: iat + ttl,
    }
}

/// Sign a single token of the given type for a user
pub fn sign(
    sub: &str,
    email: &str,
    role: &str,
    token_type: TokenType,
    ttl_seconds: Option<i64>,
) -> Result<String, SessionJwtError> {
    let secret = SECRET.as_ref().ok_or(SessionJwtError::MissingSecret)?;

    let time = make_time_claims(token_type, ttl_seconds);
    let claims = SessionClaims {
        sub: sub.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        token_type,
        iss: ISSUER.to_string(),
        aud: token_type.audience().to_string(),
        iat: time.iat,
        nbf: time.nbf,
        exp: time.exp,
        jti: cuid2::create_id(),
    };

    let header = Header::new(Algorithm::HS256);
    let encoding_key = EncodingKey::from_secret(secret);

    encode(&header, &claims, &encoding_key)
        .map_err(|e| SessionJwtError::EncodingError(e.to_string()))
}

/// Issue the access/refresh pair handed out at login
pub fn issue_pair(sub: &str, email: &str, role: &str) -> Result<TokenPair, SessionJwtError> {
    Ok(TokenPair {
        access: sign(sub, email, role, TokenType::Access, None)?,
        refresh: sign(sub, email, role, TokenType::Refresh, None)?,
    })
}

/// Verify and decode a session JWT with the expected token type
///
/// Validates issuer, audience (based on token type), and expiration.
pub fn verify(token: &str, expected_type: TokenType) -> Result<SessionClaims, SessionJwtError> {
    let secret = SECRET.as_ref().ok_or(SessionJwtError::MissingSecret)?;

    let decoding_key = DecodingKey::from_secret(secret);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_audience(&[expected_type.audience()]);

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| SessionJwtError::DecodingError(e.to_string()))?;
    let claims = token_data.claims;

    // Double-check token type claim matches
    if claims.token_type != expected_type {
        return Err(SessionJwtError::TokenTypeMismatch {
            expected: expected_type,
            got: claims.token_type,
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_roundtrip() {
        if !is_configured() {
            return;
        }

        let pair = issue_pair("user123", "user@example.com", "INTERN").expect("Failed to sign");

        let access = verify(&pair.access, TokenType::Access).expect("Failed to verify access");
        assert_eq!(access.sub, "user123");
        assert_eq!(access.email, "user@example.com");
        assert_eq!(access.role, "INTERN");
        assert_eq!(access.token_type, TokenType::Access);

        let refresh = verify(&pair.refresh, TokenType::Refresh).expect("Failed to verify refresh");
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        if !is_configured() {
            return;
        }

        let pair = issue_pair("user123", "user@example.com", "INTERN").expect("Failed to sign");
        // Audience validation already rejects the wrong type.
        assert!(verify(&pair.refresh, TokenType::Access).is_err());
        assert!(verify(&pair.access, TokenType::Refresh).is_err());
    }

    #[test]
    fn test_time_claims_allow_clock_skew() {
        let time = make_time_claims(TokenType::Access, Some(60));
        assert_eq!(time.nbf, time.iat - 30);
        assert_eq!(time.exp, time.iat + 60);
    }
}
