//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! `type` claim says which table `sub` refers to.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use parish_core::principal::PrincipalKind;
use parish_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{env_or, required, ConfigError};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Id of the user, organization or headquarters the token was issued to.
    pub sub: DbId,
    /// Which kind of principal `sub` identifies.
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from `JWT_SECRET` (required) and
    /// `JWT_EXPIRY_MINS` (default 60).
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = required("JWT_SECRET")?;
        let access_token_expiry_mins = env_or("JWT_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS)?;
        if access_token_expiry_mins <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRY_MINS",
                reason: "must be positive".into(),
            });
        }
        Ok(Self {
            secret,
            access_token_expiry_mins,
        })
    }

    /// Token lifetime in seconds, as reported in `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Generate an HS256 access token for a principal.
pub fn generate_access_token(
    kind: PrincipalKind,
    id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: id,
        kind,
        exp: now + config.expires_in_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration. An unknown `type` fails decoding.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token = generate_access_token(PrincipalKind::Organization, 42, &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.kind, PrincipalKind::Organization);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_type_claim_is_serialized_lowercase() {
        let claims = Claims {
            sub: 1,
            kind: PrincipalKind::Headquarters,
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["type"], "headquarters");
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            kind: PrincipalKind::User,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_unknown_type_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let payload = serde_json::json!({
            "sub": 1, "type": "superuser", "exp": now + 600, "iat": now, "jti": "x",
        });
        let token = encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        };

        let token = generate_access_token(PrincipalKind::User, 1, &config_a)
            .expect("token generation should succeed");

        assert!(validate_token(&token, &config_b).is_err());
    }
}
