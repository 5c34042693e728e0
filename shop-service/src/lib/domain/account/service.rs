use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenError;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::SessionGrant;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;

/// Domain service for accounts and the single-session lock.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hashing and token signing
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// First validation stage: signature and expiry, no storage access.
    ///
    /// # Returns
    /// The account id embedded in the token
    ///
    /// # Errors
    /// * `InvalidToken` - Token is forged, expired, malformed or has a bad subject
    pub fn verify_signature(&self, token: &str) -> Result<AccountId, AccountError> {
        let claims = self.authenticator.verify_session(token).map_err(|e| {
            tracing::warn!(error = %e, "Session token rejected");
            AccountError::InvalidToken
        })?;

        AccountId::from_string(claims.subject()).map_err(|e| {
            tracing::warn!(error = %e, "Session token carries an invalid subject");
            AccountError::InvalidToken
        })
    }

    fn session_lapsed(&self, stored: &str) -> bool {
        matches!(
            self.authenticator.verify_session(stored),
            Err(TokenError::Expired)
        )
    }

    /// Second validation stage: the token must be the one recorded for the account.
    ///
    /// # Errors
    /// * `InvalidToken` - Account missing, logged out, or holding another token
    /// * `DatabaseError` - Database operation failed
    pub async fn match_stored_session(
        &self,
        account_id: &AccountId,
        token: &str,
    ) -> Result<AuthenticatedAccount, AccountError> {
        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::InvalidToken)?;

        if !account.holds_session(token) {
            tracing::warn!(account_id = %account_id, "Session token is not the active session");
            return Err(AccountError::InvalidToken);
        }

        Ok(AuthenticatedAccount {
            account_id: account.id,
            username: account.username,
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AccountError::DuplicateIdentity(command.username.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| AccountError::Unknown(format!("Password hashing failed: {}", e)))?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            password_hash,
            active_session_token: None,
            created_at: Utc::now(),
        };

        let created = self.repository.create(account).await?;
        tracing::info!(account_id = %created.id, username = %created.username, "Account registered");

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<SessionGrant, AccountError> {
        let account = self
            .repository
            .find_by_username(&command.username)
            .await?
            .ok_or_else(|| AccountError::UnknownIdentity(command.username.to_string()))?;

        // A recorded session whose token has expired no longer holds the slot
        let lapsed = match account.active_session_token.as_deref() {
            None => None,
            Some(stored) if self.session_lapsed(stored) => Some(stored),
            Some(_) => {
                tracing::warn!(account_id = %account.id, "Login refused: session already active");
                return Err(AccountError::SessionAlreadyActive);
            }
        };

        let session = self
            .authenticator
            .authenticate(&command.password, &account.password_hash, account.id)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => AccountError::BadCredential,
                other => AccountError::Unknown(other.to_string()),
            })?;

        // A concurrent login may have claimed the slot since the read above
        let claimed = match lapsed {
            None => {
                self.repository
                    .claim_session(&account.id, &session.token)
                    .await?
            }
            Some(stale) => {
                self.repository
                    .replace_session(&account.id, stale, &session.token)
                    .await?
            }
        };
        if !claimed {
            tracing::warn!(account_id = %account.id, "Login lost race for the session slot");
            return Err(AccountError::SessionAlreadyActive);
        }

        let expires_at = session
            .claims
            .expires_at()
            .ok_or_else(|| AccountError::Unknown("Session expiry out of range".to_string()))?;

        tracing::info!(
            account_id = %account.id,
            replaced_expired = lapsed.is_some(),
            "Session opened"
        );

        Ok(SessionGrant {
            account_id: account.id,
            username: account.username,
            token: session.token,
            expires_at,
        })
    }

    async fn logout(&self, account: &AuthenticatedAccount) -> Result<(), AccountError> {
        self.repository
            .clear_session(&account.account_id, &account.token)
            .await?;
        tracing::info!(account_id = %account.account_id, "Session closed");

        Ok(())
    }

    async fn authenticate(
        &self,
        token: Option<&str>,
    ) -> Result<AuthenticatedAccount, AccountError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AccountError::MissingToken)?;

        let account_id = self.verify_signature(token)?;
        self.match_stored_session(&account_id, token).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::account::models::Username;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn create(&self, account: Account) -> Result<Account, AccountError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AccountError>;
            async fn claim_session(&self, id: &AccountId, token: &str) -> Result<bool, AccountError>;
            async fn replace_session(&self, id: &AccountId, stale: &str, token: &str) -> Result<bool, AccountError>;
            async fn clear_session(&self, id: &AccountId, token: &str) -> Result<(), AccountError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET))
    }

    fn stored_account(authenticator: &Authenticator, token: Option<&str>) -> Account {
        Account {
            id: AccountId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: authenticator.hash_password("pw123").unwrap(),
            active_session_token: token.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn login_command(password: &str) -> LoginCommand {
        LoginCommand {
            username: Username::new("alice".to_string()).unwrap(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|account| {
                account.username.as_str() == "alice"
                    && account.password_hash.starts_with("$argon2")
                    && account.password_hash != "pw123"
                    && account.active_session_token.is_none()
            })
            .times(1)
            .returning(|account| Ok(account));

        let service = AccountService::new(Arc::new(repository), authenticator());
        let command =
            RegisterCommand::new(Username::new("alice".to_string()).unwrap(), "pw123".into());

        let account = service.register(command).await.unwrap();
        assert_eq!(account.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let auth = authenticator();
        let existing = stored_account(&auth, None);
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = AccountService::new(Arc::new(repository), auth);
        let command =
            RegisterCommand::new(Username::new("alice".to_string()).unwrap(), "other".into());

        let result = service.register(command).await;
        assert!(matches!(result, Err(AccountError::DuplicateIdentity(_))));
    }

    #[tokio::test]
    async fn test_login_stores_issued_token() {
        let auth = authenticator();
        let account = stored_account(&auth, None);
        let account_id = account.id;
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));
        repository
            .expect_claim_session()
            .withf(move |id, token| *id == account_id && !token.is_empty())
            .times(1)
            .returning(|_, _| Ok(true));

        let service = AccountService::new(Arc::new(repository), Arc::clone(&auth));

        let grant = service.login(login_command("pw123")).await.unwrap();
        assert_eq!(grant.account_id, account_id);
        assert!(grant.expires_at > Utc::now());

        let claims = auth.verify_session(&grant.token).unwrap();
        assert_eq!(claims.subject(), account_id.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_username() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repository), authenticator());

        let result = service.login(login_command("pw123")).await;
        assert!(matches!(result, Err(AccountError::UnknownIdentity(_))));
    }

    #[tokio::test]
    async fn test_login_refused_while_session_active() {
        let auth = authenticator();
        let account = stored_account(&auth, Some("existing-token"));
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));
        repository.expect_claim_session().times(0);

        let service = AccountService::new(Arc::new(repository), auth);

        let result = service.login(login_command("pw123")).await;
        assert!(matches!(result, Err(AccountError::SessionAlreadyActive)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let auth = authenticator();
        let account = stored_account(&auth, None);
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));
        repository.expect_claim_session().times(0);

        let service = AccountService::new(Arc::new(repository), auth);

        let result = service.login(login_command("anything")).await;
        assert!(matches!(result, Err(AccountError::BadCredential)));
    }

    #[tokio::test]
    async fn test_login_losing_claim_race() {
        let auth = authenticator();
        let account = stored_account(&auth, None);
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));
        repository
            .expect_claim_session()
            .times(1)
            .returning(|_, _| Ok(false));

        let service = AccountService::new(Arc::new(repository), auth);

        let result = service.login(login_command("pw123")).await;
        assert!(matches!(result, Err(AccountError::SessionAlreadyActive)));
    }

    #[tokio::test]
    async fn test_login_replaces_expired_session() {
        let auth = authenticator();
        let expired = Authenticator::with_session_hours(SECRET, -1)
            .issue_session(AccountId::new())
            .unwrap()
            .token;
        let account = stored_account(&auth, Some(&expired));
        let account_id = account.id;
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));
        repository.expect_claim_session().times(0);
        repository
            .expect_replace_session()
            .withf(move |id, stale, token| *id == account_id && stale == expired && stale != token)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service = AccountService::new(Arc::new(repository), auth);

        let grant = service.login(login_command("pw123")).await.unwrap();
        assert_eq!(grant.account_id, account_id);
    }

    #[tokio::test]
    async fn test_login_with_expired_session_still_checks_password() {
        let auth = authenticator();
        let expired = Authenticator::with_session_hours(SECRET, -1)
            .issue_session(AccountId::new())
            .unwrap()
            .token;
        let account = stored_account(&auth, Some(&expired));
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));
        repository.expect_replace_session().times(0);

        let service = AccountService::new(Arc::new(repository), auth);

        let result = service.login(login_command("wrong")).await;
        assert!(matches!(result, Err(AccountError::BadCredential)));
    }

    #[tokio::test]
    async fn test_logout_clears_presented_session() {
        let account_id = AccountId::new();
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_clear_session()
            .withf(move |id, token| *id == account_id && token == "t1")
            .times(2)
            .returning(|_, _| Ok(()));

        let service = AccountService::new(Arc::new(repository), authenticator());
        let account = AuthenticatedAccount {
            account_id,
            username: Username::new("alice".to_string()).unwrap(),
            token: "t1".to_string(),
        };

        assert!(service.logout(&account).await.is_ok());
        assert!(service.logout(&account).await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_missing_token() {
        let repository = MockTestAccountRepository::new();
        let service = AccountService::new(Arc::new(repository), authenticator());

        assert!(matches!(
            service.authenticate(None).await,
            Err(AccountError::MissingToken)
        ));
        assert!(matches!(
            service.authenticate(Some("")).await,
            Err(AccountError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_forged_token_skips_store() {
        let mut repository = MockTestAccountRepository::new();
        repository.expect_find_by_id().times(0);

        let service = AccountService::new(Arc::new(repository), authenticator());
        let foreign = Authenticator::new(b"another_secret_key_at_least_32_bytes")
            .issue_session(AccountId::new())
            .unwrap();

        let result = service.authenticate(Some(foreign.token.as_str())).await;
        assert!(matches!(result, Err(AccountError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_authenticate_requires_stored_match() {
        let auth = authenticator();
        let mut account = stored_account(&auth, None);
        let session = auth.issue_session(account.id).unwrap();
        let current = session.token.clone();
        account.active_session_token = Some(current.clone());
        let account_id = account.id;

        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_id()
            .with(eq(account_id))
            .returning(move |_| Ok(Some(account.clone())));

        let service = AccountService::new(Arc::new(repository), Arc::clone(&auth));

        let authenticated = service.authenticate(Some(current.as_str())).await.unwrap();
        assert_eq!(authenticated.account_id, account_id);
        assert_eq!(authenticated.token, current);

        // Validly signed, but not the recorded session
        let superseded = auth.issue_session(account_id).unwrap();
        let result = service.authenticate(Some(superseded.token.as_str())).await;
        assert!(matches!(result, Err(AccountError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_authenticate_after_logout() {
        let auth = authenticator();
        let account = stored_account(&auth, None);
        let token = auth.issue_session(account.id).unwrap().token;

        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(account.clone())));

        let service = AccountService::new(Arc::new(repository), Arc::clone(&auth));

        let result = service.authenticate(Some(token.as_str())).await;
        assert!(matches!(result, Err(AccountError::InvalidToken)));
    }

    #[test]
    fn test_verify_signature_is_stateless() {
        let auth = authenticator();
        let account_id = AccountId::new();
        let token = auth.issue_session(account_id).unwrap().token;

        let service = AccountService::new(Arc::new(MockTestAccountRepository::new()), auth);

        assert_eq!(service.verify_signature(&token).unwrap(), account_id);
        assert!(matches!(
            service.verify_signature("invalid.token.here"),
            Err(AccountError::InvalidToken)
        ));
    }
}
