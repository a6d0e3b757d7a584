//! gobank - Ledger Storage Engine
//!
//! Account records with balances in PostgreSQL, and atomic transfers
//! between them under concurrent load.
//!
//! # Modules
//!
//! - [`account`] - Account model, partial updates, repository
//! - [`transfer`] - Dual-account transfer engine
//! - [`error`] - Error taxonomy with HTTP status classes
//! - [`credentials`] - Password hashing and login verification
//! - [`tokens`] - Refresh-token persistence
//! - [`db`] - Connection pool and schema bootstrap
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod account;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod logging;
pub mod tokens;
pub mod transfer;

// Convenient re-exports at crate root
pub use account::{
    Account, AccountId, AccountPatch, AccountStorage, CreateAccountRequest, NewAccount,
    PgAccountStore,
};
pub use db::Database;
pub use error::{ErrorStatus, LedgerError, LedgerResult};
pub use tokens::RefreshTokenStore;
pub use transfer::{TransferEngine, TransferIntent, TransferReceipt};
