//! Partial update statement builder
//!
//! Turns an [`AccountPatch`] into a parameterised `UPDATE`. Values are always
//! bound, never interpolated. Columns appear in a fixed order
//! (`first_name`, `last_name`, `balance`) so the SQL text is stable.
//!
//! `updated_at` uses the wall clock at write time, never earlier than the
//! stored value, so a write that waited on a row lock cannot move it back.

use sqlx::{Postgres, QueryBuilder};

use super::models::{AccountId, AccountPatch};
use crate::error::{LedgerError, LedgerResult};

/// Build the `UPDATE account ...` statement for `patch`.
///
/// Fails with [`LedgerError::NoOp`] when no field is present and with
/// `InvalidRequest` when a present value is out of range. Neither case
/// touches the store.
pub fn build_update(
    id: AccountId,
    patch: AccountPatch,
) -> LedgerResult<QueryBuilder<'static, Postgres>> {
    if patch.is_empty() {
        return Err(LedgerError::NoOp);
    }
    patch.validate()?;

    let mut qb = QueryBuilder::new("UPDATE account SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(first_name) = patch.first_name {
            set.push("first_name = ").push_bind_unseparated(first_name);
        }
        if let Some(last_name) = patch.last_name {
            set.push("last_name = ").push_bind_unseparated(last_name);
        }
        if let Some(balance) = patch.balance {
            set.push("balance = ").push_bind_unseparated(balance);
        }
        set.push("updated_at = GREATEST(updated_at, clock_timestamp())");
    }
    qb.push(" WHERE id = ").push_bind(id);

    Ok(qb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields() {
        let patch = AccountPatch {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            balance: Some(100),
        };
        let qb = build_update(AccountId::new(), patch).unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE account SET first_name = $1, last_name = $2, balance = $3, updated_at = GREATEST(updated_at, clock_timestamp()) WHERE id = $4"
        );
    }

    #[test]
    fn test_single_field_numbering() {
        let patch = AccountPatch {
            last_name: Some("Byron".to_string()),
            ..Default::default()
        };
        let qb = build_update(AccountId::new(), patch).unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE account SET last_name = $1, updated_at = GREATEST(updated_at, clock_timestamp()) WHERE id = $2"
        );
    }

    #[test]
    fn test_zero_balance_is_applied() {
        let patch = AccountPatch {
            balance: Some(0),
            ..Default::default()
        };
        let qb = build_update(AccountId::new(), patch).unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE account SET balance = $1, updated_at = GREATEST(updated_at, clock_timestamp()) WHERE id = $2"
        );
    }

    #[test]
    fn test_empty_string_is_applied() {
        let patch = AccountPatch {
            first_name: Some(String::new()),
            ..Default::default()
        };
        let qb = build_update(AccountId::new(), patch).unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE account SET first_name = $1, updated_at = GREATEST(updated_at, clock_timestamp()) WHERE id = $2"
        );
    }

    #[test]
    fn test_values_never_interpolated() {
        let hostile = "x'; DROP TABLE account; --".to_string();
        let patch = AccountPatch {
            first_name: Some(hostile.clone()),
            ..Default::default()
        };
        let qb = build_update(AccountId::new(), patch).unwrap();
        assert!(!qb.sql().contains(&hostile));
        assert!(!qb.sql().contains("DROP"));
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let result = build_update(AccountId::new(), AccountPatch::default());
        assert!(matches!(result, Err(LedgerError::NoOp)));
    }

    #[test]
    fn test_negative_balance_rejected() {
        let patch = AccountPatch {
            balance: Some(-5),
            ..Default::default()
        };
        let result = build_update(AccountId::new(), patch);
        assert!(matches!(result, Err(LedgerError::InvalidRequest(_))));
    }
}
