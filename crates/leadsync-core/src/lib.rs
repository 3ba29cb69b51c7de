//! Domain types, configuration and credential lookup shared by every leadsync crate.

pub mod app_config;
pub mod config;
pub mod credentials;
pub mod lead;
pub mod meeting;

use std::collections::BTreeMap;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::{CredentialStore, Credentials, EnvCredentialStore};
pub use lead::{properties_from_object, properties_from_payload, Lead, LeadUpdate};
pub use meeting::{Association, MeetingRequest};

/// HubSpot object properties. HubSpot accepts and returns every property
/// value as a string, so the map is string-to-string and ordered for stable
/// request bodies.
pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections of a payload before any network or store access happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
