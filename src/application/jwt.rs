use std::collections::HashSet;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
    errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Access Token Claims
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Why a raw token could not be turned into [`AccessClaims`].
///
/// Callers treat every variant the same way; the distinction is kept for logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("token is not a well-formed JWT")]
    Malformed,

    #[error("token was not signed with the expected algorithm")]
    Algorithm,

    #[error("token signature does not verify")]
    Signature,

    #[error("token claims are missing or have the wrong type")]
    Claims,
}

impl From<TokenDecodeError> for AppError {
    fn from(_: TokenDecodeError) -> Self {
        AppError::InvalidToken
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Signs and verifies HS256 access tokens with the server secret.
///
/// `decode` checks structure, algorithm, signature and claim types only.
/// Expiry and revocation are enforced by the auth use cases.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["sub".to_string(), "exp".to_string()]);

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        ttl: Duration,
        issued_at: OffsetDateTime,
    ) -> AppResult<IssuedToken> {
        let iat = issued_at.unix_timestamp();
        let exp = iat + ttl.whole_seconds();
        let claims = AccessClaims {
            sub: user_id,
            email: email.to_string(),
            exp,
            iat: Some(iat),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            AppError::Internal("Failed to sign access token".into())
        })?;

        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenDecodeError> {
        // Header problems are reported before signature checks so that a JSON
        // error from `decode` below can only come from the claims.
        let header = decode_header(token).map_err(|_| TokenDecodeError::Malformed)?;
        if header.alg != ALGORITHM {
            return Err(TokenDecodeError::Algorithm);
        }

        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm => TokenDecodeError::Algorithm,
                ErrorKind::InvalidSignature => TokenDecodeError::Signature,
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                    TokenDecodeError::Malformed
                }
                _ => TokenDecodeError::Claims,
            })
    }
}
