//! Process wiring: config and credentials in, a ready [`LeadFlow`] out.

use std::sync::Arc;

use leadsync_core::{AppConfig, CredentialStore, Credentials};
use leadsync_db::{PgLeadMirror, PoolConfig, StoreError};
use leadsync_hubspot::{GatewayError, HubspotClient};
use sqlx::PgPool;
use thiserror::Error;

use crate::LeadFlow;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HubSpot client setup failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Everything a binary needs once startup has finished.
pub struct Runtime {
    pub config: AppConfig,
    pub pool: PgPool,
    pub flow: LeadFlow,
}

/// Resolves credentials, connects the pool, applies migrations and builds
/// the HubSpot client. Credentials are read once here.
///
/// # Errors
///
/// Returns [`BootstrapError`] if the database is unreachable, a migration
/// fails, or the HubSpot client cannot be built. A missing access token is
/// not an error here; gateway calls report it instead.
pub async fn bootstrap(
    config: AppConfig,
    store: &dyn CredentialStore,
) -> Result<Runtime, BootstrapError> {
    let credentials = Credentials::resolve(store, &config.credential_service);
    if credentials.access_token.is_none() {
        tracing::warn!(
            service = %config.credential_service,
            "no HubSpot access token found; lead creation will fail until one is configured"
        );
    }

    let options = leadsync_db::connect_options(&config, &credentials)?;
    let pool = leadsync_db::connect_pool(options, PoolConfig::from_app_config(&config)).await?;
    let applied = leadsync_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");

    let client = HubspotClient::with_base_url(
        credentials.access_token.as_deref(),
        config.hubspot_timeout_secs,
        &config.hubspot_base_url,
    )?;

    let flow = LeadFlow::new(
        Arc::new(client),
        Arc::new(PgLeadMirror::new(pool.clone())),
    );

    Ok(Runtime { config, pool, flow })
}
