//! Repository layer for account persistence

use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

use super::models::{Account, AccountId, AccountPatch, NewAccount};
use super::update::build_update;
use crate::error::{LedgerError, LedgerResult};
use crate::transfer::{TransferEngine, TransferIntent, TransferReceipt};

const SELECT_ACCOUNT: &str = r#"
    SELECT id, first_name, last_name, user_name, number, balance, created_at, updated_at
    FROM account"#;

/// Account storage contract consumed by the HTTP and auth layers
#[async_trait]
pub trait AccountStorage: Send + Sync {
    /// Insert a zero-balance account and return the stored row
    async fn create(&self, account: NewAccount) -> LedgerResult<Account>;

    async fn get_by_id(&self, id: AccountId) -> LedgerResult<Account>;

    /// All accounts in store order
    async fn list_all(&self) -> LedgerResult<Vec<Account>>;

    async fn delete_by_id(&self, id: AccountId) -> LedgerResult<()>;

    /// Apply the present fields of `patch`
    async fn update(&self, id: AccountId, patch: AccountPatch) -> LedgerResult<()>;

    /// Stored password hash for login verification
    async fn password_hash_by_username(&self, username: &str) -> LedgerResult<String>;

    /// Move funds from `sender` (the authenticated caller) to the intent's receiver
    async fn transfer(
        &self,
        sender: AccountId,
        intent: &TransferIntent,
    ) -> LedgerResult<TransferReceipt>;
}

/// PostgreSQL-backed account store
pub struct PgAccountStore {
    pool: PgPool,
    transfers: TransferEngine,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            transfers: TransferEngine::new(pool.clone()),
            pool,
        }
    }

    /// Bound row-lock waits inside transfers
    pub fn with_lock_timeout(self, timeout: Duration) -> Self {
        Self {
            transfers: self.transfers.with_lock_timeout(timeout),
            pool: self.pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn not_found(id: AccountId) -> LedgerError {
        LedgerError::not_found(format!("Account with ID: {}", id))
    }
}

#[async_trait]
impl AccountStorage for PgAccountStore {
    async fn create(&self, account: NewAccount) -> LedgerResult<Account> {
        // Insert and re-read share one transaction so the returned
        // timestamps are the committed ones.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO account (id, first_name, last_name, user_name, password_hash, number, balance)
            VALUES ($1, $2, $3, $4, $5, $6, 0)
            "#,
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.number)
        .execute(&mut *tx)
        .await
        .map_err(|e| match LedgerError::from(e) {
            LedgerError::Conflict(_) => LedgerError::Conflict(format!(
                "username '{}' is already taken",
                account.username
            )),
            other => other,
        })?;

        let created: Account = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_ACCOUNT))
            .bind(account.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(account_id = %created.id, username = %created.username, "Account created");
        Ok(created)
    }

    async fn get_by_id(&self, id: AccountId) -> LedgerResult<Account> {
        sqlx::query_as(&format!("{} WHERE id = $1", SELECT_ACCOUNT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list_all(&self) -> LedgerResult<Vec<Account>> {
        let accounts = sqlx::query_as(SELECT_ACCOUNT)
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }

    async fn delete_by_id(&self, id: AccountId) -> LedgerResult<()> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }

    async fn update(&self, id: AccountId, patch: AccountPatch) -> LedgerResult<()> {
        let mut qb = build_update(id, patch)?;
        let result = qb.build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        tracing::debug!(account_id = %id, "Account updated");
        Ok(())
    }

    async fn password_hash_by_username(&self, username: &str) -> LedgerResult<String> {
        sqlx::query_scalar("SELECT password_hash FROM account WHERE user_name = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                LedgerError::not_found(format!("Account with username: {}", username))
            })
    }

    async fn transfer(
        &self,
        sender: AccountId,
        intent: &TransferIntent,
    ) -> LedgerResult<TransferReceipt> {
        self.transfers.execute(sender, intent).await
    }
}
