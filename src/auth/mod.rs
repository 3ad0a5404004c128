//! Bearer token gate for protected routes.
//!
//! [`TokenGate::authorize`] is the whole decision: it takes the raw
//! `Authorization` header and returns either the decoded [`Claims`] (forward)
//! or an [`AuthError`] (reject with 401). It keeps no state between calls and
//! never logs; the HTTP adapter lives in [`crate::middleware`].

mod clock;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

pub use clock::{Clock, FixedClock, SystemClock};

const BEARER_SCHEME: &str = "Bearer";

/// Payload of an accepted token. Fields other than `exp` are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized. Token should be provided.")]
    MissingCredential,
    #[error("Unauthorized. Invalid token type.")]
    MalformedScheme,
    #[error("Unauthorized. Invalid token type.")]
    UndecodableToken,
    #[error("Unauthorized. Token expired.")]
    ExpiredToken,
    #[error("Unauthorized. Invalid token signature.")]
    SignatureInvalid,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"message": self.to_string()})),
        )
            .into_response()
    }
}

/// How token payloads are trusted.
#[derive(Clone)]
pub enum TokenPolicy {
    /// Read the payload without checking the signature. Any well-formed token
    /// with a future `exp` is accepted, forged or not.
    DecodeOnly,
    /// Require a valid HMAC signature made with `secret`.
    Verify { secret: Vec<u8>, algorithm: Algorithm },
}

impl fmt::Debug for TokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeOnly => f.write_str("DecodeOnly"),
            Self::Verify { algorithm, .. } => f
                .debug_struct("Verify")
                .field("algorithm", algorithm)
                .finish_non_exhaustive(),
        }
    }
}

/// Lenient base64url: token issuers disagree on padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

enum Decoder {
    /// Only the payload segment is read; header and signature are ignored.
    PayloadOnly,
    Verified {
        validation: Validation,
        key: DecodingKey,
    },
}

pub struct TokenGate {
    decoder: Decoder,
    clock: Arc<dyn Clock>,
}

impl TokenGate {
    pub fn new(policy: TokenPolicy) -> Self {
        let decoder = match policy {
            TokenPolicy::DecodeOnly => Decoder::PayloadOnly,
            TokenPolicy::Verify { secret, algorithm } => {
                let mut validation = Validation::new(algorithm);
                // Expiry is checked against the injected clock, with no leeway.
                validation.validate_exp = false;
                validation.validate_nbf = false;
                validation.validate_aud = false;
                validation.set_required_spec_claims::<&str>(&[]);

                Decoder::Verified {
                    validation,
                    key: DecodingKey::from_secret(&secret),
                }
            }
        };

        Self {
            decoder,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Builds the gate from `JWT_SECRET_KEY` / `JWT_ALGORITHM`. Without a
    /// secret the gate only decodes.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let Some(secret) = &settings.jwt_secret_key else {
            return Ok(Self::new(TokenPolicy::DecodeOnly));
        };

        let algorithm = Algorithm::from_str(&settings.jwt_algorithm)
            .with_context(|| format!("unknown JWT_ALGORITHM {:?}", settings.jwt_algorithm))?;
        anyhow::ensure!(
            matches!(
                algorithm,
                Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
            ),
            "JWT_ALGORITHM {:?} is not an HMAC algorithm",
            settings.jwt_algorithm
        );

        Ok(Self::new(TokenPolicy::Verify {
            secret: secret.as_bytes().to_vec(),
            algorithm,
        }))
    }

    pub fn mode(&self) -> &'static str {
        match self.decoder {
            Decoder::PayloadOnly => "decode-only",
            Decoder::Verified { .. } => "verify",
        }
    }

    pub fn authorize(&self, header: Option<&HeaderValue>) -> Result<Claims, AuthError> {
        self.authorize_at(header, self.clock.now_millis())
    }

    /// Evaluates `header` as of `now_ms` (milliseconds since the epoch).
    pub fn authorize_at(
        &self,
        header: Option<&HeaderValue>,
        now_ms: i64,
    ) -> Result<Claims, AuthError> {
        let header = header
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        let value = header.to_str().map_err(|_| AuthError::MalformedScheme)?;

        let mut parts = value.split(' ');
        if parts.next() != Some(BEARER_SCHEME) {
            return Err(AuthError::MalformedScheme);
        }
        let token = parts.next().unwrap_or_default();

        let claims = self.decode_claims(token)?;

        if claims.exp.saturating_mul(1000) < now_ms {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        match &self.decoder {
            Decoder::PayloadOnly => {
                let payload = token.split('.').nth(1).ok_or(AuthError::UndecodableToken)?;
                let bytes = PAYLOAD_ENGINE
                    .decode(payload)
                    .map_err(|_| AuthError::UndecodableToken)?;
                serde_json::from_slice(&bytes).map_err(|_| AuthError::UndecodableToken)
            }
            Decoder::Verified { validation, key } => decode::<Claims>(token, key, validation)
                .map(|data| data.claims)
                .map_err(|e| match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        AuthError::SignatureInvalid
                    }
                    _ => AuthError::UndecodableToken,
                }),
        }
    }
}

impl fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGate")
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}
