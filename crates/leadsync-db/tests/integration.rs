//! Offline unit tests for leadsync-db pool and connection configuration.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use leadsync_core::{AppConfig, Credentials, Environment};
use leadsync_db::{connect_options, PoolConfig, StoreError};

fn app_config(database_url: Option<&str>, db_name: Option<&str>) -> AppConfig {
    AppConfig {
        database_url: database_url.map(str::to_owned),
        db_host: "db.internal".to_string(),
        db_port: 6543,
        db_name: db_name.map(str::to_owned),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
        log_level: "info".to_string(),
        credential_service: "hubspot_service".to_string(),
        hubspot_base_url: "https://api.hubspot.com".to_string(),
        hubspot_timeout_secs: 30,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config(None, Some("leads")));
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn connect_options_assembles_from_parts_and_credentials() {
    let credentials = Credentials {
        access_token: None,
        db_user: Some("leadsync".to_string()),
        db_password: Some("secret".to_string()),
    };

    let options = connect_options(&app_config(None, Some("leads")), &credentials)
        .expect("options should build");
    assert_eq!(options.get_host(), "db.internal");
    assert_eq!(options.get_port(), 6543);
    assert_eq!(options.get_database(), Some("leads"));
    assert_eq!(options.get_username(), "leadsync");
}

#[test]
fn connect_options_prefers_database_url() {
    let options = connect_options(
        &app_config(Some("postgres://u:p@urlhost:5433/urldb"), Some("ignored")),
        &Credentials::default(),
    )
    .expect("options should parse");
    assert_eq!(options.get_host(), "urlhost");
    assert_eq!(options.get_port(), 5433);
    assert_eq!(options.get_database(), Some("urldb"));
}

#[test]
fn connect_options_without_url_or_name_is_rejected() {
    let err = connect_options(&app_config(None, None), &Credentials::default()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidConnection(_)));
}
