//! Transfer Module
//!
//! Atomic balance transfers between two accounts.

pub mod engine;
pub mod lock_order;
pub mod types;

pub use engine::TransferEngine;
pub use lock_order::lock_order;
pub use types::{TransferIntent, TransferReceipt};
