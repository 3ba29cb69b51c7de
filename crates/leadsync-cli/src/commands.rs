use leadsync_core::{AppConfig, Credentials, EnvCredentialStore, LeadUpdate, MeetingRequest};
use leadsync_db::PoolConfig;
use leadsync_flow::{Tool, ToolResult, ToolStatus};
use leadsync_hubspot::{CrmGateway, HubspotClient};
use serde_json::{Map, Value};
use sqlx::PgPool;

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let credentials = Credentials::resolve(&EnvCredentialStore, &config.credential_service);
    let options = leadsync_db::connect_options(config, &credentials)?;
    let pool = leadsync_db::connect_pool(options, PoolConfig::from_app_config(config)).await?;
    Ok(pool)
}

pub(crate) async fn db_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    leadsync_db::ping(&pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn db_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let applied = leadsync_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Builds a flat lead payload from the flags that were given.
pub(crate) fn lead_payload(fields: &[(&str, Option<String>)]) -> Value {
    let object: Map<String, Value> = fields
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| ((*key).to_owned(), Value::String(v.clone())))
        })
        .collect();
    Value::Object(object)
}

/// Prints the result as JSON and fails the process when the tool failed.
fn report(result: &ToolResult) -> anyhow::Result<()> {
    println!("{}", result.to_json_string());
    if result.status == ToolStatus::Error {
        anyhow::bail!("{}", result.message);
    }
    Ok(())
}

pub(crate) async fn lead_create(config: AppConfig, payload: &Value) -> anyhow::Result<()> {
    let runtime = leadsync_flow::bootstrap(config, &EnvCredentialStore).await?;
    let result = Tool::CreateLead.invoke(&runtime.flow, payload).await;
    report(&result)
}

pub(crate) async fn lead_update(config: AppConfig, update: &LeadUpdate) -> anyhow::Result<()> {
    let runtime = leadsync_flow::bootstrap(config, &EnvCredentialStore).await?;
    let result = ToolResult::from(runtime.flow.update_lead(update).await);
    report(&result)
}

pub(crate) async fn meeting_create(
    config: AppConfig,
    request: &MeetingRequest,
) -> anyhow::Result<()> {
    let runtime = leadsync_flow::bootstrap(config, &EnvCredentialStore).await?;
    let result = ToolResult::from(runtime.flow.create_meeting(request).await);
    report(&result)
}

pub(crate) async fn lead_find(config: &AppConfig, email: &str) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match leadsync_db::find_lead_by_email(&pool, email).await? {
        Some(row) => println!("{}", serde_json::to_string_pretty(&row)?),
        None => println!("no lead mirrored for {email}"),
    }
    Ok(())
}

pub(crate) async fn lead_delete(config: &AppConfig, hubspot_id: &str) -> anyhow::Result<()> {
    let credentials = Credentials::resolve(&EnvCredentialStore, &config.credential_service);
    let client = HubspotClient::with_base_url(
        credentials.access_token.as_deref(),
        config.hubspot_timeout_secs,
        &config.hubspot_base_url,
    )?;
    client.delete_contact(hubspot_id).await?;
    tracing::warn!(hubspot_id, "contact deleted in HubSpot; any mirrored row is left in place");
    println!("deleted HubSpot contact {hubspot_id}");
    Ok(())
}
