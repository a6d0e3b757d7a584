//! Account management module
//!
//! PostgreSQL-based storage for ledger accounts.

pub mod models;
pub mod repository;
pub mod update;

// Re-export commonly used types
pub use models::{Account, AccountId, AccountPatch, CreateAccountRequest, NewAccount};
pub use repository::{AccountStorage, PgAccountStore};
pub use update::build_update;

// Re-export Database from top-level db module
pub use crate::db::Database;
