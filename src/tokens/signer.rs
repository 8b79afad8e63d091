//! HS256 token signing and verification.
//!
//! Tokens carry the account email as `sub`, an `exp` claim checked with zero
//! leeway, and a random `jti` so that two tokens issued to the same subject in
//! the same second are still distinct strings.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{JwtConfig, MIN_SECRET_BYTES};

/// Fixed scheme label returned with every issued token
pub const TOKEN_TYPE: &str = "Bearer";

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Token signing failed: {0}")]
    Signing(String),
    #[error("Signing key must be at least {MIN_SECRET_BYTES} bytes")]
    WeakKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub sub: String,
}

/// Claims of a token whose signature and expiry have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub expires_at: DateTime<Utc>,
    pub subject: String,
    pub token_id: String,
}

pub trait TokenSigner: Send + Sync {
    /// Sign a fresh token for `subject`, expiring after the configured lifetime.
    fn sign(&self, subject: &str) -> Result<String, SignerError>;

    /// Check signature first, then expiry against the current time.
    fn verify(&self, token: &str) -> Result<VerifiedToken, SignerError>;

    /// Configured token lifetime
    fn expiration_seconds(&self) -> u64;
}

pub struct JwtSigner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    expiration_seconds: u64,
    validation: Validation,
}

impl JwtSigner {
    pub fn new(secret: &str, expiration_seconds: u64) -> Result<Self, SignerError> {
        if secret.trim().is_empty() || secret.len() < MIN_SECRET_BYTES {
            return Err(SignerError::WeakKey);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            expiration_seconds,
            validation,
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, SignerError> {
        Self::new(&config.secret, config.expiration_seconds)
    }

    /// Sign as if the token had been issued at `issued_at`.
    pub fn sign_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, SignerError> {
        let expires_at = i64::try_from(self.expiration_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                SignerError::Signing(format!(
                    "token lifetime of {}s is out of range",
                    self.expiration_seconds
                ))
            })?;
        let claims = Claims {
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            sub: subject.to_string(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| SignerError::Signing(e.to_string()))
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, subject: &str) -> Result<String, SignerError> {
        self.sign_at(subject, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<VerifiedToken, SignerError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => SignerError::Expired,
                _ => SignerError::Invalid(e.to_string()),
            }
        })?;

        let claims = data.claims;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| SignerError::Invalid("exp out of range".to_string()))?;

        if claims.sub.is_empty() {
            return Err(SignerError::Invalid("empty subject".to_string()));
        }

        Ok(VerifiedToken {
            expires_at,
            subject: claims.sub,
            token_id: claims.jti,
        })
    }

    fn expiration_seconds(&self) -> u64 {
        self.expiration_seconds
    }
}
