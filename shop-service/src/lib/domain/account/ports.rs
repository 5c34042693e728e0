use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::SessionGrant;
use crate::domain::account::models::Username;

/// Port for registration and session lifecycle.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Create a new account with no active session.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Open the single session allowed for an account.
    ///
    /// # Returns
    /// The issued token, already recorded as the account's active session
    ///
    /// # Errors
    /// * `UnknownIdentity` - No account with this username
    /// * `SessionAlreadyActive` - A session is recorded, unexpired and not logged out
    /// * `BadCredential` - Password does not match
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<SessionGrant, AccountError>;

    /// Close the session held by `account`. Idempotent.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, account: &AuthenticatedAccount) -> Result<(), AccountError>;

    /// Resolve a presented token into the authenticated account.
    ///
    /// # Errors
    /// * `MissingToken` - No token presented
    /// * `InvalidToken` - Forged, expired, superseded or logged-out token
    /// * `DatabaseError` - Database operation failed
    async fn authenticate(&self, token: Option<&str>)
        -> Result<AuthenticatedAccount, AccountError>;
}

/// Persistence operations for the credential store.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Returns
    /// Optional account (None if not found)
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Retrieve account by username.
    ///
    /// # Returns
    /// Optional account (None if not found)
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Account>, AccountError>;

    /// Record `token` as the active session only if none is recorded.
    ///
    /// # Returns
    /// `true` if the token was stored, `false` if a session was already active
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn claim_session(&self, id: &AccountId, token: &str) -> Result<bool, AccountError>;

    /// Swap `stale` for `token` only if `stale` is still the recorded session.
    ///
    /// # Returns
    /// `true` if the token was stored, `false` if the slot had moved on
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn replace_session(
        &self,
        id: &AccountId,
        stale: &str,
        token: &str,
    ) -> Result<bool, AccountError>;

    /// Clear the active session if it is still `token`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn clear_session(&self, id: &AccountId, token: &str) -> Result<(), AccountError>;
}
