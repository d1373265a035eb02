use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::crypto::sign;
use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Validation;
use serde::Serialize;
use uuid::Uuid;

use super::claims::AccessClaims;
use super::errors::TokenError;

/// Issuer tag written into every access token by default.
pub const DEFAULT_ISSUER: &str = "chirpy";

/// JOSE header, serialized `alg` first as other JWT libraries emit it.
#[derive(Serialize)]
struct CompactHeader {
    alg: Algorithm,
    typ: &'static str,
}

/// Signs and verifies short-lived access tokens.
///
/// Tokens use compact JWT framing with HS256. The codec holds the signing
/// secret for its whole lifetime and is safe to share between requests.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
}

impl AccessTokenCodec {
    /// Create a codec with a signing secret and issuer tag.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret (must be non-empty)
    /// * `issuer` - Value written to and expected in the `iss` claim
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
        }
    }

    /// Issuer tag used by this codec.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    ///
    /// `ttl` may be negative, producing a token that is already expired.
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry out of range or token encoding failed
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let claims = AccessClaims::new(subject, &self.issuer, Utc::now(), ttl)?;
        self.encode(&claims)
    }

    /// Sign an explicit set of claims.
    ///
    /// Produces `base64url(header).base64url(claims).base64url(signature)`
    /// with the header `{"alg":"HS256","typ":"JWT"}`.
    pub fn encode(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        let header = CompactHeader {
            alg: self.algorithm,
            typ: "JWT",
        };

        let header = serde_json::to_vec(&header)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;
        let payload =
            serde_json::to_vec(claims).map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        let message = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let signature = sign(message.as_bytes(), &self.encoding_key, self.algorithm)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(format!("{}.{}", message, signature))
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    /// * `Malformed` - Token structure, claims or subject are invalid
    /// * `SignatureMismatch` - Signature does not match (wrong secret or tampering)
    /// * `Expired` - Signature is valid but the token has expired
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.decode(token)?;

        claims
            .subject()
            .map_err(|e| TokenError::Malformed(format!("Invalid subject: {}", e)))
    }

    /// Verify a token and return all of its claims.
    ///
    /// Structure is checked first, then the signature, then the claims, so
    /// a tampered `exp` always surfaces as `SignatureMismatch`.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        check_structure(token)?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

/// Require three base64url segments whose header and payload are JSON objects.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    };

    for (name, segment) in [("header", header), ("payload", payload)] {
        let bytes = URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|e| TokenError::Malformed(format!("{} is not base64url: {}", name, e)))?;
        serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&bytes)
            .map_err(|e| TokenError::Malformed(format!("{} is not a JSON object: {}", name, e)))?;
    }

    URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| TokenError::Malformed(format!("signature is not base64url: {}", e)))?;

    Ok(())
}
