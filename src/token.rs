use jsonwebtoken::{
    decode, encode, errors::ErrorKind, get_current_timestamp, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    model::CurrentUser,
};

/// Session tokens stay valid for one hour after issuance.
pub const TOKEN_TTL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
    /// Validity window in milliseconds, handed to the client for cookie bookkeeping.
    pub expires_in_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("token signature invalid")]
    SignatureInvalid,
    #[error("unexpected signing algorithm")]
    WrongAlgorithm,
}

/// Issues and checks HS256-signed session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    pub fn issue(&self, user: &CurrentUser) -> Result<IssuedToken> {
        self.issue_at(user, get_current_timestamp())
    }

    pub(crate) fn issue_at(&self, user: &CurrentUser, now: u64) -> Result<IssuedToken> {
        let claims = Claims {
            sub: user.username.clone(),
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
            expires_in_ms: self.ttl_secs * 1000,
        })
    }

    pub fn validate(&self, token: &str) -> std::result::Result<CurrentUser, TokenError> {
        self.validate_at(token, get_current_timestamp())
    }

    fn validate_at(&self, token: &str, now: u64) -> std::result::Result<CurrentUser, TokenError> {
        // Expiry is checked below against `now` with no leeway; the library check
        // would accept a token whose expiry equals the current second.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::WrongAlgorithm
                }
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        Ok(CurrentUser {
            username: claims.sub,
        })
    }
}
