// ============================
// crates/auth-core/src/token.rs
// ============================
//! Signed token issuance and verification.
//!
//! Compact HS256 JWTs with an embedded `type` claim. Access and refresh
//! tokens sign with independent secrets so a refresh token can never be
//! replayed as an access token; reset tokens share the access secret but
//! carry their own type and a much shorter lifetime.
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::store::{Role, UserRecord};

/// Discriminates what a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
    Reset,
}

/// Raw claims as they appear on the wire. Access tokens fill every field;
/// refresh and reset tokens carry only the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Verified access-token claims, as consumed by request middleware.
#[derive(Debug, Clone, Serialize)]
pub struct AccessClaims {
    pub subject_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Issued-at (Unix timestamp, seconds).
    pub issued_at: i64,
}

/// Issues and verifies the three token kinds.
///
/// Stateless and cheaply cloneable; safe to call concurrently.
#[derive(Clone)]
pub struct TokenCodec {
    access_enc: EncodingKey,
    access_dec: DecodingKey,
    refresh_enc: EncodingKey,
    refresh_dec: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    reset_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from the two signing secrets.
    ///
    /// An empty secret is a fatal configuration error: startup must abort
    /// rather than ever issuing a weakly signed token.
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
        reset_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if access_secret.is_empty() {
            return Err(AuthError::Configuration(
                "access token secret is not set".to_string(),
            ));
        }
        if refresh_secret.is_empty() {
            return Err(AuthError::Configuration(
                "refresh token secret is not set".to_string(),
            ));
        }

        Ok(Self {
            access_enc: EncodingKey::from_secret(access_secret.as_bytes()),
            access_dec: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_enc: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_dec: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
            reset_ttl,
        })
    }

    /// Issue an access token carrying the user's public identity claims.
    pub fn issue_access(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: Some(user.email.clone()),
            name: Some(user.name.clone()),
            role: Some(user.role),
            kind: TokenKind::Access,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        self.sign(&claims, &self.access_enc)
    }

    /// Issue a refresh token for the subject. Subject-only claims.
    pub fn issue_refresh(&self, subject: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            email: None,
            name: None,
            role: None,
            kind: TokenKind::Refresh,
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };
        self.sign(&claims, &self.refresh_enc)
    }

    /// Issue a short-lived, single-purpose password reset token.
    pub fn issue_reset(&self, subject: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            email: None,
            name: None,
            role: None,
            kind: TokenKind::Reset,
            iat: now.timestamp(),
            exp: (now + self.reset_ttl).timestamp(),
        };
        self.sign(&claims, &self.access_enc)
    }

    /// Verify an access token and return its typed claims.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let claims = self.verify(token, TokenKind::Access)?;
        let subject_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let (Some(email), Some(name), Some(role)) = (claims.email, claims.name, claims.role)
        else {
            return Err(AuthError::InvalidToken);
        };
        Ok(AccessClaims {
            subject_id,
            email,
            name,
            role,
            issued_at: claims.iat,
        })
    }

    /// Verify a refresh token and return its subject.
    pub fn verify_refresh(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.verify(token, TokenKind::Refresh)?;
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a password reset token and return its subject.
    pub fn verify_reset(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.verify(token, TokenKind::Reset)?;
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)
    }

    /// Verify signature, expiry and the `type` claim.
    ///
    /// A token that fails the expected key but verifies under the other
    /// secret is a type mix-up (e.g. a refresh token presented as an access
    /// token) and reports `WrongTokenType`, not `InvalidToken`.
    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, self.decoding_key(expected), &validation) {
            Ok(data) => {
                if data.claims.kind != expected {
                    return Err(AuthError::WrongTokenType);
                }
                Ok(data.claims)
            },
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
                ErrorKind::InvalidSignature => {
                    let mut lenient = Validation::new(Algorithm::HS256);
                    lenient.validate_exp = false;
                    if decode::<Claims>(token, self.other_key(expected), &lenient).is_ok() {
                        Err(AuthError::WrongTokenType)
                    } else {
                        Err(AuthError::InvalidToken)
                    }
                },
                _ => Err(AuthError::InvalidToken),
            },
        }
    }

    fn sign(&self, claims: &Claims, key: &EncodingKey) -> Result<String, AuthError> {
        encode(&Header::default(), claims, key).map_err(|_| {
            AuthError::Configuration("failed to sign token".to_string())
        })
    }

    fn decoding_key(&self, kind: TokenKind) -> &DecodingKey {
        match kind {
            TokenKind::Access | TokenKind::Reset => &self.access_dec,
            TokenKind::Refresh => &self.refresh_dec,
        }
    }

    fn other_key(&self, kind: TokenKind) -> &DecodingKey {
        match kind {
            TokenKind::Access | TokenKind::Reset => &self.refresh_dec,
            TokenKind::Refresh => &self.access_dec,
        }
    }
}
