// SPDX-License-Identifier: AGPL-3.0-or-later

//! Token issuance and verification.
//!
//! All tokens are HS256 JWTs signed with the process-wide secret from
//! [`crate::config::AppConfig`]. Rotating the secret invalidates every
//! outstanding token, which is acceptable: sessions are short-lived.
//!
//! Tokens are scoped to a purpose (session, email verification, password
//! reset) and are only accepted for that purpose. Verification and reset
//! tokens are additionally stored on the credential record for one-time-use
//! revocation; the signature alone does not prove they are still current.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, Role};

/// What a token is allowed to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// Bearer token for authenticated requests (24h)
    Session,
    /// Email verification link (1h)
    Verify,
    /// Password reset link (15m)
    Reset,
}

impl TokenPurpose {
    fn ttl(&self) -> Duration {
        match self {
            TokenPurpose::Session => Duration::hours(24),
            TokenPurpose::Verify => Duration::hours(1),
            TokenPurpose::Reset => Duration::minutes(15),
        }
    }
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity key (user id)
    pub sub: String,
    /// Account email at issuance time
    pub email: String,
    /// Role at issuance time
    pub role: Role,
    /// Purpose this token was issued for
    pub purpose: TokenPurpose,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// Signs and verifies purpose-scoped JWTs.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for the given identity and purpose.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
        purpose: TokenPurpose,
    ) -> Result<String, AuthError> {
        self.issue_with_ttl(user_id, email, role, purpose, purpose.ttl())
    }

    fn issue_with_ttl(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            purpose,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing: {e}")))
    }

    /// Verify a token and require the expected purpose.
    ///
    /// `Expired` and `Malformed` are distinguished so the authentication gate
    /// can produce different user-facing messages.
    pub fn verify(&self, token: &str, expected: TokenPurpose) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        if data.claims.purpose != expected {
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }
}
