use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let non_empty = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let database_url = non_empty("DATABASE_URL");
    let db_name = non_empty("LEADSYNC_DB_NAME");
    if database_url.is_none() && db_name.is_none() {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let env = parse_environment(&or_default("LEADSYNC_ENV", "development"))?;
    let bind_addr: SocketAddr = parse_as(
        "LEADSYNC_BIND_ADDR",
        &or_default("LEADSYNC_BIND_ADDR", "127.0.0.1:8000"),
    )?;
    let log_level = or_default("LEADSYNC_LOG_LEVEL", "info");

    let db_host = or_default("LEADSYNC_DB_HOST", "localhost");
    let db_port: u16 = parse_as("LEADSYNC_DB_PORT", &or_default("LEADSYNC_DB_PORT", "5432"))?;
    let db_max_connections: u32 = parse_as(
        "LEADSYNC_DB_MAX_CONNECTIONS",
        &or_default("LEADSYNC_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections: u32 = parse_as(
        "LEADSYNC_DB_MIN_CONNECTIONS",
        &or_default("LEADSYNC_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_as(
        "LEADSYNC_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("LEADSYNC_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEADSYNC_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    let credential_service = or_default("LEADSYNC_CREDENTIAL_SERVICE", "hubspot_service");
    let hubspot_base_url = or_default("LEADSYNC_HUBSPOT_BASE_URL", "https://api.hubspot.com");
    let hubspot_timeout_secs: u64 = parse_as(
        "LEADSYNC_HUBSPOT_TIMEOUT_SECS",
        &or_default("LEADSYNC_HUBSPOT_TIMEOUT_SECS", "30"),
    )?;
    if hubspot_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEADSYNC_HUBSPOT_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        db_host,
        db_port,
        db_name,
        env,
        bind_addr,
        log_level,
        credential_service,
        hubspot_base_url,
        hubspot_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LEADSYNC_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
