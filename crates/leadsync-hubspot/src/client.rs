//! HTTP client for the HubSpot CRM v3 objects API.
//!
//! Wraps `reqwest` with bearer-token auth and normalises every outcome into
//! [`GatewayError`]: transport failures, non-2xx statuses, and 2xx responses
//! that carry no usable record are all distinct variants.

use std::time::Duration;

use async_trait::async_trait;
use leadsync_core::{properties_from_object, Association, Properties};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::CrmGateway;
use crate::types::{RemoteLeadRecord, RemoteMeetingRecord};

const DEFAULT_BASE_URL: &str = "https://api.hubspot.com";
const CONTACTS: [&str; 4] = ["crm", "v3", "objects", "contacts"];
const MEETINGS: [&str; 4] = ["crm", "v3", "objects", "meetings"];

/// Client for the HubSpot CRM REST API.
///
/// The access token is fixed at construction. Use [`HubspotClient::new`] for
/// production or [`HubspotClient::with_base_url`] to point at a mock server.
pub struct HubspotClient {
    client: Client,
    access_token: Option<String>,
    base_url: Url,
}

#[derive(Serialize)]
struct ObjectBody<'a> {
    properties: &'a Properties,
    #[serde(skip_serializing_if = "Option::is_none")]
    associations: Option<&'a [Association]>,
}

impl HubspotClient {
    /// Creates a client pointed at the production HubSpot API.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ClientBuild`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(access_token: Option<&str>, timeout_secs: u64) -> Result<Self, GatewayError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// A `None` or blank token is accepted; every call then fails with
    /// [`GatewayError::NoCredential`] without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ClientBuild`] if the `reqwest::Client` cannot
    /// be constructed, or [`GatewayError::InvalidBaseUrl`] if `base_url` does
    /// not parse as an absolute URL.
    pub fn with_base_url(
        access_token: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadsync/0.1 (lead-intake)")
            .build()
            .map_err(GatewayError::ClientBuild)?;

        let parsed =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| GatewayError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;
        if parsed.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        let access_token = access_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        Ok(Self {
            client,
            access_token,
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.access_token.is_some()
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn contact_endpoint(&self, id: &str) -> Url {
        let mut url = self.endpoint(&CONTACTS);
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(id);
        }
        url
    }

    /// Starts an authenticated request, or refuses when no token is configured.
    fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, GatewayError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(GatewayError::NoCredential)?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Sends the request and returns the 2xx status with its raw body.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Unreachable`] if no response status was received or
    ///   the body could not be read.
    /// - [`GatewayError::RemoteRejected`] for any non-2xx status.
    async fn execute(&self, request: RequestBuilder) -> Result<(u16, String), GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "HubSpot rejected request");
            tracing::debug!(status = status.as_u16(), body = %body, "HubSpot rejection body");
            return Err(GatewayError::RemoteRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok((status.as_u16(), body))
    }

    /// POSTs an object body and extracts the created record.
    async fn create_object(
        &self,
        segments: &[&str],
        body: &ObjectBody<'_>,
    ) -> Result<(String, Properties), GatewayError> {
        let url = self.endpoint(segments);
        let request = self.authorized(Method::POST, url)?.json(body);
        let (status, raw) = self.execute(request).await?;
        let (id, echoed) = parse_created(status, raw)?;
        Ok((id, echoed.unwrap_or_else(|| body.properties.clone())))
    }
}

/// Extracts `id` and `properties` from a 2xx create response.
///
/// # Errors
///
/// Returns [`GatewayError::AmbiguousSuccess`] when the body is empty, not
/// JSON, or has no non-empty `id`.
fn parse_created(status: u16, body: String) -> Result<(String, Option<Properties>), GatewayError> {
    if body.trim().is_empty() {
        return Err(GatewayError::AmbiguousSuccess { status, body });
    }

    let Ok(value) = serde_json::from_str::<Value>(&body) else {
        return Err(GatewayError::AmbiguousSuccess { status, body });
    };

    let id = match value.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(GatewayError::AmbiguousSuccess { status, body }),
    };

    let properties = value
        .get("properties")
        .and_then(Value::as_object)
        .map(properties_from_object);

    Ok((id, properties))
}

#[async_trait]
impl CrmGateway for HubspotClient {
    async fn create_contact(
        &self,
        properties: &Properties,
    ) -> Result<RemoteLeadRecord, GatewayError> {
        let body = ObjectBody {
            properties,
            associations: None,
        };
        let (hubspot_id, properties) = self.create_object(&CONTACTS, &body).await?;
        tracing::info!(hubspot_id = %hubspot_id, "HubSpot contact created");
        Ok(RemoteLeadRecord {
            hubspot_id,
            properties,
        })
    }

    async fn update_contact(
        &self,
        id: &str,
        properties: &Properties,
    ) -> Result<(), GatewayError> {
        if self.access_token.is_none() {
            return Err(GatewayError::NoCredential);
        }
        let id = id.trim();
        if id.is_empty() {
            return Err(GatewayError::MissingId);
        }

        let body = ObjectBody {
            properties,
            associations: None,
        };
        let request = self
            .authorized(Method::PATCH, self.contact_endpoint(id))?
            .json(&body);
        self.execute(request).await?;
        tracing::info!(hubspot_id = %id, "HubSpot contact updated");
        Ok(())
    }

    async fn create_meeting(
        &self,
        properties: &Properties,
        associations: &[Association],
    ) -> Result<RemoteMeetingRecord, GatewayError> {
        let body = ObjectBody {
            properties,
            associations: Some(associations),
        };
        let (hubspot_id, properties) = self.create_object(&MEETINGS, &body).await?;
        tracing::info!(hubspot_id = %hubspot_id, "HubSpot meeting created");
        Ok(RemoteMeetingRecord {
            hubspot_id,
            properties,
        })
    }

    async fn delete_contact(&self, id: &str) -> Result<(), GatewayError> {
        if self.access_token.is_none() {
            return Err(GatewayError::NoCredential);
        }
        let id = id.trim();
        if id.is_empty() {
            return Err(GatewayError::MissingId);
        }

        let request = self.authorized(Method::DELETE, self.contact_endpoint(id))?;
        self.execute(request).await?;
        tracing::info!(hubspot_id = %id, "HubSpot contact deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
