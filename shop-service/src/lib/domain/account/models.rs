use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::AccountIdError;
use crate::domain::account::errors::UsernameError;

/// Account aggregate.
///
/// `active_session_token` is `Some` only between a successful login and the
/// next logout. It holds the issued token verbatim.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub password_hash: String,
    pub active_session_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether `token` is exactly the session currently recorded.
    pub fn holds_session(&self, token: &str) -> bool {
        self.active_session_token.as_deref() == Some(token)
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacters);
        }

        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new account.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(username: Username, password: String) -> Self {
        Self { username, password }
    }
}

/// Command to open a session.
#[derive(Debug)]
pub struct LoginCommand {
    pub username: Username,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub account_id: AccountId,
    pub username: Username,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity resolved from a validated session token.
///
/// Passed explicitly into every protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub username: Username,
    pub token: String,
}
