use sqlx::PgPool;

/// Create the ledger tables if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing PostgreSQL schema...");

    sqlx::query(CREATE_ACCOUNT_TABLE).execute(pool).await?;
    sqlx::query(CREATE_REFRESH_TOKENS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_REFRESH_TOKENS_INDEX).execute(pool).await?;

    tracing::info!("PostgreSQL schema ready");
    Ok(())
}

pub const CREATE_ACCOUNT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS account (
    id            UUID PRIMARY KEY,
    first_name    VARCHAR(100) NOT NULL,
    last_name     VARCHAR(100) NOT NULL,
    user_name     VARCHAR(100) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    number        BIGINT NOT NULL,
    balance       BIGINT NOT NULL DEFAULT 0 CHECK (balance >= 0),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub const CREATE_REFRESH_TOKENS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS refresh_tokens (
    id         UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id UUID NOT NULL REFERENCES account(id) ON DELETE CASCADE,
    token      VARCHAR(255) UNIQUE NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    revoked    BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

pub const CREATE_REFRESH_TOKENS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_account ON refresh_tokens(account_id)";
