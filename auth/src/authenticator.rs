use chrono::Duration;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::SessionClaims;
use crate::token::TokenError;
use crate::token::TokenSigner;

/// Sessions last 24 hours unless configured otherwise.
pub const DEFAULT_SESSION_HOURS: i64 = 24;

/// Coordinates password verification and session token minting.
///
/// Holds no per-account state: whether an account may open a session, and
/// whether a verified token is still the current one, is decided by the
/// service that owns the credential store.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    signer: TokenSigner,
    session_lifetime: Duration,
}

/// A freshly minted session token and its claims.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator with the default session lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    pub fn new(secret: &[u8]) -> Self {
        Self::with_session_hours(secret, DEFAULT_SESSION_HOURS)
    }

    /// Create an authenticator whose sessions last `hours`.
    pub fn with_session_hours(secret: &[u8], hours: i64) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            signer: TokenSigner::new(secret),
            session_lifetime: Duration::hours(hours),
        }
    }

    pub fn session_lifetime(&self) -> Duration {
        self.session_lifetime
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and mint a session token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Account identifier to bind the token to
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash unusable
    /// * `TokenError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<IssuedSession, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_session(subject)?)
    }

    /// Mint a session token without password verification.
    ///
    /// # Errors
    /// * `TokenError` - Token signing failed
    pub fn issue_session(&self, subject: impl ToString) -> Result<IssuedSession, TokenError> {
        let claims = SessionClaims::issue(subject, self.session_lifetime);
        let token = self.signer.sign(&claims)?;

        Ok(IssuedSession { token, claims })
    }

    /// Stateless check of a presented token: signature and expiry only.
    ///
    /// # Errors
    /// * `TokenError` - Token is expired, forged or malformed
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.signer.verify(token)
    }
}
