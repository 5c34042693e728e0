use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Top-level error for registration, login, logout and session validation.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Username already exists: {0}")]
    DuplicateIdentity(String),

    #[error("No account with username: {0}")]
    UnknownIdentity(String),

    #[error("Invalid credentials")]
    BadCredential,

    #[error("A session is already active for this account")]
    SessionAlreadyActive,

    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid or expired session token")]
    InvalidToken,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}
