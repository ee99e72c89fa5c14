//! JWT Token Generation and Validation
//!
//! HS256 access/refresh token pairs signed with the server secret. The
//! `typ` claim keeps the two token kinds from being swapped.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// Claims carried by both token kinds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a UUID string.
    pub sub: String,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Issued at, Unix seconds.
    pub iat: i64,
    /// Which kind of token this is.
    pub typ: TokenType,
}

impl Claims {
    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// What a successful login or refresh hands back.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token, seconds.
    pub access_expires_in: i64,
}

/// Generate both access and refresh tokens.
pub fn generate_token_pair(
    user_id: Uuid,
    secret: &str,
    access_expiry_seconds: i64,
    refresh_expiry_seconds: i64,
) -> AuthResult<TokenPair> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    let access_claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(access_expiry_seconds)).timestamp(),
        iat: now.timestamp(),
        typ: TokenType::Access,
    };
    let access_token = encode(
        &Header::new(Algorithm::HS256),
        &access_claims,
        &encoding_key,
    )?;

    let refresh_claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(refresh_expiry_seconds)).timestamp(),
        iat: now.timestamp(),
        typ: TokenType::Refresh,
    };
    let refresh_token = encode(
        &Header::new(Algorithm::HS256),
        &refresh_claims,
        &encoding_key,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        access_expires_in: access_expiry_seconds,
    })
}

/// Validate and decode an access token.
///
/// Returns an error if the token is invalid, expired, or is a refresh token.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    validate_token(token, secret, TokenType::Access)
}

/// Validate and decode a refresh token.
///
/// Returns an error if the token is invalid, expired, or is an access token.
pub fn validate_refresh_token(token: &str, secret: &str) -> AuthResult<Claims> {
    validate_token(token, secret, TokenType::Refresh)
}

fn validate_token(token: &str, secret: &str, expected: TokenType) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    })?;

    if token_data.claims.typ != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_pair_round_trip() {
        let user_id = Uuid::new_v4();
        let pair = generate_token_pair(user_id, SECRET, 900, 604_800).unwrap();

        let access = validate_access_token(&pair.access_token, SECRET).unwrap();
        assert_eq!(access.user_id().unwrap(), user_id);
        assert_eq!(access.typ, TokenType::Access);

        let refresh = validate_refresh_token(&pair.refresh_token, SECRET).unwrap();
        assert_eq!(refresh.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_token_types_not_interchangeable() {
        let pair = generate_token_pair(Uuid::new_v4(), SECRET, 900, 604_800).unwrap();

        assert!(matches!(
            validate_access_token(&pair.refresh_token, SECRET),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            validate_refresh_token(&pair.access_token, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let pair = generate_token_pair(Uuid::new_v4(), SECRET, 900, 604_800).unwrap();
        assert!(validate_access_token(&pair.access_token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_reports_expiry() {
        let pair = generate_token_pair(Uuid::new_v4(), SECRET, -60, 604_800).unwrap();
        assert!(matches!(
            validate_access_token(&pair.access_token, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }
}
