/**
 * Session Tokens
 *
 * Mints and verifies the signed tokens carried in the `Authorization`
 * cookie. Claims are `{sub: <baid>, exp: <unix seconds>}` signed with
 * HMAC-SHA256 over the process-wide session secret.
 *
 * Verification accepts only the HMAC family in the header; `none` and
 * asymmetric algorithms are rejected before any signature work, which
 * closes the algorithm-confusion hole.
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::shared::config::DEFAULT_SESSION_TTL_DAYS;
use crate::shared::Baid;

/// Largest Baid that survives a round trip through an IEEE double
pub const MAX_TOKEN_BAID: Baid = 1 << 53;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Baid of the session owner
    #[serde(deserialize_with = "deserialize_subject")]
    pub sub: Baid,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Accept an integer subject, or a float one (rounded) from issuers that
/// serialize every number as a double.
fn deserialize_subject<'de, D>(deserializer: D) -> Result<Baid, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_u64() {
        if value <= MAX_TOKEN_BAID {
            return Ok(value);
        }
    } else if let Some(value) = number.as_f64() {
        if value.is_finite() && value >= 0.0 && value <= MAX_TOKEN_BAID as f64 {
            return Ok(value.round() as Baid);
        }
    }
    Err(D::Error::custom("subject is not a valid baid"))
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad structure, signature, algorithm, or claims
    #[error("session token is invalid")]
    Invalid,

    #[error("session token has expired")]
    Expired,

    #[error("baid {0} cannot be carried in a session token")]
    SubjectOutOfRange(Baid),

    #[error("failed to sign session token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// A freshly minted token and the moment it stops being accepted
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with one secret fixed at startup.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionCodec {
    /// Create a codec for `secret` issuing tokens valid for `ttl`.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Codec with the standard 30 day lifetime
    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::days(DEFAULT_SESSION_TTL_DAYS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a token for `baid` using the configured lifetime.
    pub fn mint(&self, baid: Baid) -> Result<SessionToken, TokenError> {
        self.mint_with_ttl(baid, self.ttl)
    }

    /// Create a token for `baid` expiring `ttl` from now.
    pub fn mint_with_ttl(&self, baid: Baid, ttl: Duration) -> Result<SessionToken, TokenError> {
        if baid > MAX_TOKEN_BAID {
            return Err(TokenError::SubjectOutOfRange(baid));
        }

        let expires_at = Utc::now() + ttl;
        let claims = Claims {
            sub: baid,
            exp: expires_at.timestamp(),
        };

        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;

        Ok(SessionToken { value, expires_at })
    }

    /// Verify `token` and return the Baid it was issued for.
    pub fn verify(&self, token: &str) -> Result<Baid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}
