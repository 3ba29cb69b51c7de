use std::time::Duration;

use leadsync_core::{AppConfig, Credentials};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/leadsync-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (duplicate `hubspot_id`).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A meeting referenced a lead that is not mirrored locally.
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Pool exhausted, closed, or the database could not be reached.
    #[error("database connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid connection settings: {0}")]
    InvalidConnection(String),

    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_owned())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::ForeignKeyViolation(db.message().to_owned())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::ConnectionUnavailable(err.to_string())
            }
            _ => Self::Sqlx(err),
        }
    }
}

/// Resolves connection options from `DATABASE_URL` or from the discrete
/// host/port/name settings plus the `db_user`/`db_password` credentials.
///
/// # Errors
///
/// Returns [`StoreError::InvalidConnection`] if the URL does not parse or no
/// database name is configured.
pub fn connect_options(
    config: &AppConfig,
    credentials: &Credentials,
) -> Result<PgConnectOptions, StoreError> {
    if let Some(url) = config.database_url.as_deref() {
        return url
            .parse::<PgConnectOptions>()
            .map_err(|e| StoreError::InvalidConnection(e.to_string()));
    }

    let database = config
        .db_name
        .as_deref()
        .ok_or_else(|| StoreError::InvalidConnection("no database name configured".to_owned()))?;

    let mut options = PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .database(database);
    if let Some(user) = credentials.db_user.as_deref() {
        options = options.username(user);
    }
    if let Some(password) = credentials.db_password.as_deref() {
        options = options.password(password);
    }
    Ok(options)
}

/// Connect a bounded Postgres pool.
///
/// # Errors
///
/// Returns [`StoreError::ConnectionUnavailable`] if the database cannot be
/// reached within the acquire timeout.
pub async fn connect_pool(
    options: PgConnectOptions,
    config: PoolConfig,
) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    // The _sqlx_migrations table does not exist yet on a fresh database.
    let applied_before: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    MIGRATOR.run(pool).await?;

    let applied_after: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

pub mod leads;
pub mod meetings;
pub mod memory;
pub mod mirror;

pub use leads::{find_lead_by_email, get_lead_by_hubspot_id, insert_lead, LocalLeadRow, NewLead};
pub use meetings::{insert_meeting, list_meetings_for_lead, MeetingRow, NewMeeting};
pub use memory::InMemoryLeadMirror;
pub use mirror::{LeadMirror, PgLeadMirror};
