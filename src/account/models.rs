//! Data models for ledger accounts

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::credentials;
use crate::error::{LedgerError, LedgerResult};

/// Column width of the profile fields in the `account` table
pub const MAX_PROFILE_FIELD_LEN: usize = 100;

/// Account identifier (UUID v4)
///
/// Ordering is the byte order of the UUID, which matches the lexicographic
/// order of its canonical lowercase string form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct AccountId(Uuid);

#[allow(clippy::new_without_default)]
impl AccountId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| LedgerError::invalid(format!("malformed account id '{}'", s)))
    }
}

/// Materialized account row. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(rename = "user_name")]
    #[serde(rename = "userName")]
    pub username: String,
    pub number: i64,
    /// Smallest currency unit
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account creation payload from the HTTP boundary
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "userName")]
    pub username: String,
    pub password: String,
}

/// Account ready to be inserted: identity and number assigned, password hashed.
///
/// Balance is not a field: every account starts at zero.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub number: i64,
}

impl NewAccount {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            number: random_account_number(),
        }
    }

    /// Validate the payload and hash its password
    pub fn from_request(req: CreateAccountRequest) -> LedgerResult<Self> {
        check_profile_field("firstName", &req.first_name)?;
        check_profile_field("lastName", &req.last_name)?;
        check_profile_field("userName", &req.username)?;
        if req.username.trim().is_empty() {
            return Err(LedgerError::invalid("userName must not be empty"));
        }
        // Lookups match the stored name exactly, so it is never trimmed.
        if req.username.trim() != req.username {
            return Err(LedgerError::invalid(
                "userName must not start or end with whitespace",
            ));
        }
        if req.password.is_empty() {
            return Err(LedgerError::invalid("password must not be empty"));
        }

        let password_hash = credentials::hash_password(&req.password)?;
        Ok(Self::new(
            req.first_name,
            req.last_name,
            req.username,
            password_hash,
        ))
    }
}

/// Sparse field-level update. `None` leaves the column untouched,
/// `Some` is applied even when zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub balance: Option<i64>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.balance.is_none()
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if let Some(first_name) = &self.first_name {
            check_profile_field("firstName", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            check_profile_field("lastName", last_name)?;
        }
        if self.balance.is_some_and(|b| b < 0) {
            return Err(LedgerError::invalid("balance must not be negative"));
        }
        Ok(())
    }
}

/// Random 63-bit display number (non-negative `i64`)
pub fn random_account_number() -> i64 {
    rand::thread_rng().gen_range(0..i64::MAX)
}

fn check_profile_field(field: &str, value: &str) -> LedgerResult<()> {
    let len = value.chars().count();
    if len > MAX_PROFILE_FIELD_LEN {
        return Err(LedgerError::invalid(format!(
            "{} exceeds {} characters (got {})",
            field, MAX_PROFILE_FIELD_LEN, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_parse() {
        let id = AccountId::new();
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);

        let err = "not-a-uuid".parse::<AccountId>().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRequest(_)));
    }

    #[test]
    fn test_account_id_order_matches_string_order() {
        let a: AccountId = "0b2f0d4e-0000-4000-8000-000000000000".parse().unwrap();
        let b: AccountId = "94e531b7-5c08-4297-a889-77298034bc32".parse().unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_random_account_number_non_negative() {
        for _ in 0..1000 {
            assert!(random_account_number() >= 0);
        }
    }

    #[test]
    fn test_patch_presence() {
        assert!(AccountPatch::default().is_empty());

        let patch = AccountPatch {
            balance: Some(0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_patch_rejects_negative_balance() {
        let patch = AccountPatch {
            balance: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(LedgerError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_patch_deserialize_absent_vs_zero() {
        let patch: AccountPatch = serde_json::from_str(r#"{"balance": 0}"#).unwrap();
        assert_eq!(patch.balance, Some(0));
        assert_eq!(patch.first_name, None);

        let patch: AccountPatch = serde_json::from_str(r#"{"firstName": ""}"#).unwrap();
        assert_eq!(patch.first_name, Some(String::new()));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_new_account_from_request() {
        let req = CreateAccountRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            password: "hunter2".to_string(),
        };
        let account = NewAccount::from_request(req).unwrap();
        assert_eq!(account.username, "ada");
        assert!(account.number >= 0);
        assert!(!account.id.is_nil());
        assert_ne!(account.password_hash, "hunter2");
        assert!(credentials::verify_password(&account.password_hash, "hunter2").is_ok());
    }

    #[test]
    fn test_new_account_rejects_empty_username() {
        let req = CreateAccountRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "   ".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(matches!(
            NewAccount::from_request(req),
            Err(LedgerError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_new_account_rejects_padded_username() {
        for username in [" ada", "ada ", "\tada\n"] {
            let req = CreateAccountRequest {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                username: username.to_string(),
                password: "hunter2".to_string(),
            };
            assert!(
                matches!(
                    NewAccount::from_request(req),
                    Err(LedgerError::InvalidRequest(_))
                ),
                "accepted {:?}",
                username
            );
        }
    }

    #[test]
    fn test_create_request_wire_names() {
        let req: CreateAccountRequest = serde_json::from_str(
            r#"{"firstName":"Ada","lastName":"Lovelace","userName":"ada","password":"hunter2"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name, "Ada");
        assert_eq!(req.last_name, "Lovelace");
        assert_eq!(req.username, "ada");
        assert_eq!(req.password, "hunter2");
    }

    #[test]
    fn test_account_serializes_user_name() {
        let account = Account {
            id: AccountId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            number: 42,
            balance: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["userName"], "ada");
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("username").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_new_account_rejects_long_names() {
        let req = CreateAccountRequest {
            first_name: "x".repeat(MAX_PROFILE_FIELD_LEN + 1),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(matches!(
            NewAccount::from_request(req),
            Err(LedgerError::InvalidRequest(_))
        ));
    }
}
