//! Credential lookup by logical key.
//!
//! Secrets live outside the process configuration (an OS keyring or the
//! environment). Each secret is addressed by a service id
//! plus a logical key such as `access_token`. Resolution happens once at
//! startup; nothing re-reads credentials per call.

use std::collections::HashMap;
use std::hash::BuildHasher;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const DB_USER_KEY: &str = "db_user";
pub const DB_PASSWORD_KEY: &str = "db_password";

/// A source of secrets addressed by `(service, key)`.
pub trait CredentialStore: Send + Sync {
    /// Returns the secret, or `None` when it is unset or blank.
    fn get(&self, service: &str, key: &str) -> Option<String>;
}

/// Resolves `(service, key)` to the environment variable
/// `<SERVICE>_<KEY>` in upper case, e.g. `HUBSPOT_SERVICE_ACCESS_TOKEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn get(&self, service: &str, key: &str) -> Option<String> {
        std::env::var(env_var_name(service, key))
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

/// Map-backed store keyed by the same variable names as [`EnvCredentialStore`].
impl<S: BuildHasher + Send + Sync> CredentialStore for HashMap<String, String, S> {
    fn get(&self, service: &str, key: &str) -> Option<String> {
        HashMap::get(self, &env_var_name(service, key))
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

#[must_use]
pub fn env_var_name(service: &str, key: &str) -> String {
    format!("{service}_{key}")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// The secrets the process needs, resolved once.
#[derive(Clone, Default)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
}

impl Credentials {
    pub fn resolve(store: &dyn CredentialStore, service: &str) -> Self {
        Self {
            access_token: store.get(service, ACCESS_TOKEN_KEY),
            db_user: store.get(service, DB_USER_KEY),
            db_password: store.get(service, DB_PASSWORD_KEY),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("db_user", &self.db_user)
            .field(
                "db_password",
                &self.db_password.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn env_var_name_upper_cases_and_joins() {
        assert_eq!(
            env_var_name("hubspot_service", "access_token"),
            "HUBSPOT_SERVICE_ACCESS_TOKEN"
        );
        assert_eq!(env_var_name("hub-spot", "db.user"), "HUB_SPOT_DB_USER");
    }

    #[test]
    fn resolve_reads_all_keys() {
        let s = store(&[
            ("HUBSPOT_SERVICE_ACCESS_TOKEN", "pat-123"),
            ("HUBSPOT_SERVICE_DB_USER", "leads"),
            ("HUBSPOT_SERVICE_DB_PASSWORD", "hunter2"),
        ]);
        let creds = Credentials::resolve(&s, "hubspot_service");
        assert_eq!(creds.access_token.as_deref(), Some("pat-123"));
        assert_eq!(creds.db_user.as_deref(), Some("leads"));
        assert_eq!(creds.db_password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let s = store(&[("HUBSPOT_SERVICE_ACCESS_TOKEN", "  ")]);
        let creds = Credentials::resolve(&s, "hubspot_service");
        assert!(creds.access_token.is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials {
            access_token: Some("pat-123".to_string()),
            db_user: Some("leads".to_string()),
            db_password: Some("hunter2".to_string()),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("pat-123"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("leads"));
    }
}
