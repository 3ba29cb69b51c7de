use leadsync_core::LeadUpdate;
use serde_json::Value;

use crate::outcome::{FailureReason, UpdateOutcome};
use crate::LeadFlow;

impl LeadFlow {
    /// Updates a HubSpot contact. The local mirror is left as it was.
    #[tracing::instrument(skip_all, fields(hubspot_id = %update.lead_id))]
    pub async fn update_lead(&self, update: &LeadUpdate) -> UpdateOutcome {
        match self
            .gateway
            .update_contact(&update.lead_id, &update.properties)
            .await
        {
            Ok(()) => UpdateOutcome::Success {
                remote_id: update.lead_id.clone(),
            },
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "HubSpot contact update failed");
                UpdateOutcome::Failed(FailureReason::from_gateway(&e))
            }
        }
    }

    /// [`LeadFlow::update_lead`] for a raw `{"lead_id", "properties"}` payload.
    pub async fn update_lead_from_payload(&self, payload: &Value) -> UpdateOutcome {
        match LeadUpdate::from_payload(payload) {
            Ok(update) => self.update_lead(&update).await,
            Err(e) => UpdateOutcome::Failed(FailureReason::new(e.to_string())),
        }
    }
}
