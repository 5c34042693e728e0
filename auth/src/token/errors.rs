use thiserror::Error;

/// Error type for session token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
