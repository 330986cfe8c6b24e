use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Claims carried by a board session credential.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The one board this credential grants access to.
    pub board_id: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// A freshly issued credential together with the claims it binds.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
    pub board_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Why a presented credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was presented at all.
    Missing,
    /// Bad signature, malformed token or expired.
    Invalid,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::Missing => write!(f, "Authentication required"),
            AuthError::Invalid => write!(f, "Invalid or expired session"),
        }
    }
}

/// Signs and checks HS256 credentials with a process-lifetime secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Produces a signed credential for `board_id`, valid for the configured lifetime.
    pub fn issue(&self, board_id: &str) -> Result<Credential, AppError> {
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::InternalServerError("Credential expiry overflow".into()))?;

        let claims = Claims {
            board_id: board_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        Ok(Credential {
            token,
            board_id: claims.board_id,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(expires_at),
        })
    }

    /// Checks signature and expiry and returns the bound claims.
    ///
    /// No further authorization is applied: a valid credential for a board grants
    /// full access to that board.
    pub fn verify(&self, token: Option<&str>) -> Result<Claims, AuthError> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthError::Missing),
        };

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("rejected session credential: {}", e);
                AuthError::Invalid
            })
    }
}
