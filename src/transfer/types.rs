//! Transfer request and receipt types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::error::{LedgerError, LedgerResult};

/// Move `amount` from the authenticated caller to `receiver_id`.
///
/// The sender is never part of the payload; it is passed to the engine
/// alongside the intent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferIntent {
    pub receiver_id: AccountId,
    /// Smallest currency unit, strictly positive
    pub amount: i64,
}

impl TransferIntent {
    pub fn new(receiver_id: AccountId, amount: i64) -> Self {
        Self {
            receiver_id,
            amount,
        }
    }

    /// Checks that need no store access
    pub fn validate(&self, sender: AccountId) -> LedgerResult<()> {
        if self.amount <= 0 {
            return Err(LedgerError::invalid("amount must be greater than zero"));
        }
        if self.receiver_id.is_nil() {
            return Err(LedgerError::invalid("receiver must be specified"));
        }
        if sender.is_nil() {
            return Err(LedgerError::invalid("sender must be specified"));
        }
        if sender == self.receiver_id {
            return Err(LedgerError::invalid(
                "sender and receiver must be different accounts",
            ));
        }
        Ok(())
    }
}

/// Post-commit view of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub amount: i64,
    pub sender_balance: i64,
    pub receiver_balance: i64,
    pub committed_at: DateTime<Utc>,
}
