//! Transfer Engine
//!
//! Moves funds between two accounts inside one PostgreSQL transaction:
//!
//! 1. validate the intent (no I/O)
//! 2. begin, bound lock waits with `SET LOCAL lock_timeout`
//! 3. lock both rows with `FOR UPDATE` in [`lock_order`]
//! 4. guarded debit (`balance >= amount` in the same statement)
//!    stamping `updated_at` with `clock_timestamp()`, never earlier than the
//!    stored value (`now()` is frozen at transaction start, before lock waits)
//! 5. credit
//! 6. commit
//!
//! Every failure after step 2 rolls the transaction back. A cancelled future
//! drops the `Transaction`, which also rolls back.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::lock_order::lock_order;
use super::types::{TransferIntent, TransferReceipt};
use crate::account::AccountId;
use crate::error::{LedgerError, LedgerResult};

pub struct TransferEngine {
    pool: PgPool,
    lock_timeout: Option<Duration>,
}

impl TransferEngine {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout: None,
        }
    }

    /// Give up waiting for a row lock after `timeout` (reported as `Busy`)
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// Execute a transfer from `sender` to `intent.receiver_id`.
    ///
    /// Either both balances change and the receipt is returned, or nothing
    /// is visible in the store.
    pub async fn execute(
        &self,
        sender: AccountId,
        intent: &TransferIntent,
    ) -> LedgerResult<TransferReceipt> {
        intent.validate(sender)?;

        let mut tx = self.pool.begin().await?;

        match self.apply(&mut tx, sender, intent).await {
            Ok(receipt) => {
                tx.commit().await?;
                info!(
                    sender = %receipt.sender_id,
                    receiver = %receipt.receiver_id,
                    amount = receipt.amount,
                    sender_balance = receipt.sender_balance,
                    receiver_balance = receipt.receiver_balance,
                    "Transfer committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    // The connection is discarded; the server aborts the transaction.
                    warn!(error = %rollback_err, "Transfer rollback failed");
                }
                debug!(
                    sender = %sender,
                    receiver = %intent.receiver_id,
                    amount = intent.amount,
                    code = e.code(),
                    "Transfer aborted"
                );
                Err(e)
            }
        }
    }

    async fn apply(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        sender: AccountId,
        intent: &TransferIntent,
    ) -> LedgerResult<TransferReceipt> {
        if let Some(timeout) = self.lock_timeout {
            // SET does not take bind parameters; the value is a plain integer.
            sqlx::query(&format!(
                "SET LOCAL lock_timeout = {}",
                timeout.as_millis()
            ))
            .execute(&mut **tx)
            .await?;
        }

        for id in lock_order(sender, intent.receiver_id) {
            let locked: Option<AccountId> =
                sqlx::query_scalar("SELECT id FROM account WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await?;
            if locked.is_none() {
                return Err(LedgerError::not_found(format!("Account with ID: {}", id)));
            }
        }

        let debited: Option<(i64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            UPDATE account SET balance = balance - $1, updated_at = GREATEST(updated_at, clock_timestamp())
            WHERE id = $2 AND balance >= $1
            RETURNING balance, updated_at
            "#,
        )
        .bind(intent.amount)
        .bind(sender)
        .fetch_optional(&mut **tx)
        .await?;
        let (sender_balance, committed_at) = debited.ok_or(LedgerError::InsufficientFunds)?;

        let credited: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE account SET balance = balance + $1, updated_at = GREATEST(updated_at, clock_timestamp())
            WHERE id = $2
            RETURNING balance
            "#,
        )
        .bind(intent.amount)
        .bind(intent.receiver_id)
        .fetch_optional(&mut **tx)
        .await?;
        let receiver_balance = credited.ok_or_else(|| {
            LedgerError::not_found(format!("Account with ID: {}", intent.receiver_id))
        })?;

        Ok(TransferReceipt {
            sender_id: sender,
            receiver_id: intent.receiver_id,
            amount: intent.amount,
            sender_balance,
            receiver_balance,
            committed_at,
        })
    }
}
