//! Canonical row-lock order for a pair of accounts
//!
//! Two transfers touching the same pair must request the row locks in the
//! same order whichever side is sending, otherwise each can end up holding
//! one lock while waiting for the other.

use crate::account::AccountId;

/// Return `a` and `b` in ascending identifier order.
pub fn lock_order(a: AccountId, b: AccountId) -> [AccountId; 2] {
    if a <= b { [a, b] } else { [b, a] }
}
