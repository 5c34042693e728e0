use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: PgRow) -> Result<Account, AccountError> {
        let id: Uuid = row.try_get("id").map_err(database_error)?;
        let username: String = row.try_get("username").map_err(database_error)?;
        let password_hash: String = row.try_get("password_hash").map_err(database_error)?;
        let active_session_token: Option<String> =
            row.try_get("active_session_token").map_err(database_error)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(database_error)?;

        Ok(Account {
            id: AccountId(id),
            username: Username::new(username)?,
            password_hash,
            active_session_token,
            created_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(e.to_string())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, password_hash, active_session_token, created_at)
            VALUES ($1, $2, $3, NULL, $4)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("accounts_username_key")
                {
                    return AccountError::DuplicateIdentity(account.username.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, active_session_token, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Self::row_to_account).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, active_session_token, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Self::row_to_account).transpose()
    }

    async fn claim_session(&self, id: &AccountId, token: &str) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET active_session_token = $2
            WHERE id = $1 AND active_session_token IS NULL
            "#,
        )
        .bind(id.0)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn replace_session(
        &self,
        id: &AccountId,
        stale: &str,
        token: &str,
    ) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET active_session_token = $3
            WHERE id = $1 AND active_session_token = $2
            "#,
        )
        .bind(id.0)
        .bind(stale)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_session(&self, id: &AccountId, token: &str) -> Result<(), AccountError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET active_session_token = NULL
            WHERE id = $1 AND active_session_token = $2
            "#,
        )
        .bind(id.0)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }
}
