use async_trait::async_trait;
use leadsync_core::{Association, Properties};

use crate::error::GatewayError;
use crate::types::{RemoteLeadRecord, RemoteMeetingRecord};

/// The CRM operations the lead flows depend on.
///
/// [`crate::HubspotClient`] is the production implementation; flows hold an
/// `Arc<dyn CrmGateway>` so tests can substitute their own.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    /// `POST /crm/v3/objects/contacts`.
    async fn create_contact(
        &self,
        properties: &Properties,
    ) -> Result<RemoteLeadRecord, GatewayError>;

    /// `PATCH /crm/v3/objects/contacts/{id}`.
    async fn update_contact(&self, id: &str, properties: &Properties)
        -> Result<(), GatewayError>;

    /// `POST /crm/v3/objects/meetings`.
    async fn create_meeting(
        &self,
        properties: &Properties,
        associations: &[Association],
    ) -> Result<RemoteMeetingRecord, GatewayError>;

    /// `DELETE /crm/v3/objects/contacts/{id}`.
    async fn delete_contact(&self, id: &str) -> Result<(), GatewayError>;
}
