use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::TokenError;

/// Signs and verifies session tokens (HS256).
///
/// Verification is stateless: it checks the signature and the `exp` claim
/// only. Whether the token is still the one recorded for the account is a
/// separate, stateful check owned by the caller.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Create a new signer with a shared secret.
    ///
    /// # Arguments
    /// * `secret` - HMAC key, at least 32 bytes
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    /// * `Expired` - `exp` is in the past
    /// * `BadSignature` - Token was not signed with this secret
    /// * `Malformed` - Token could not be parsed
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}
