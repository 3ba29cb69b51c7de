use leadsync_core::{properties_from_payload, Lead, Properties};
use serde_json::Value;
use tracing::Span;

use crate::outcome::{FailureReason, LeadOutcome};
use crate::LeadFlow;

impl LeadFlow {
    /// Creates a lead in HubSpot and mirrors it locally.
    ///
    /// Steps run in order and stop at the first terminal state: email
    /// validation, duplicate check against the mirror (fails closed when the
    /// mirror is unavailable), HubSpot create, mirror insert. A mirror insert
    /// failure yields [`LeadOutcome::PartialSuccess`]; the HubSpot contact is
    /// kept.
    #[tracing::instrument(skip_all, fields(email = tracing::field::Empty, hubspot_id = tracing::field::Empty))]
    pub async fn create_lead(&self, properties: &Properties) -> LeadOutcome {
        let lead = match Lead::from_properties(properties) {
            Ok(lead) => lead,
            Err(e) => {
                tracing::warn!(error = %e, "lead rejected before any I/O");
                return LeadOutcome::Failed(FailureReason::new(e.to_string()));
            }
        };
        Span::current().record("email", lead.email.as_str());

        match self.mirror.find_by_email(&lead.email).await {
            Ok(Some(existing)) => {
                tracing::info!(hubspot_id = %existing.hubspot_id, "lead already exists");
                return LeadOutcome::RejectedDuplicate {
                    remote_id: existing.hubspot_id,
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "duplicate check failed");
                return LeadOutcome::Failed(
                    FailureReason::new("duplicate check unavailable").with_details(e.to_string()),
                );
            }
        }

        let request = lead.to_properties();
        let remote = match self.gateway.create_contact(&request).await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "HubSpot contact creation failed");
                return LeadOutcome::Failed(FailureReason::from_gateway(&e));
            }
        };
        Span::current().record("hubspot_id", remote.hubspot_id.as_str());

        match self.mirror.insert_lead(&remote.hubspot_id, &request).await {
            Ok(row) => {
                tracing::info!(local_id = row.id, "lead created and mirrored");
                LeadOutcome::Success {
                    remote_id: remote.hubspot_id,
                    local_id: row.id,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "lead created in HubSpot but mirror write failed");
                LeadOutcome::PartialSuccess {
                    remote_id: remote.hubspot_id,
                    local_error: e.to_string(),
                }
            }
        }
    }

    /// [`LeadFlow::create_lead`] for a raw agent payload, wrapped
    /// (`{"properties": {...}}`) or flat.
    pub async fn create_lead_from_payload(&self, payload: &Value) -> LeadOutcome {
        match properties_from_payload(payload) {
            Ok(properties) => self.create_lead(&properties).await,
            Err(e) => LeadOutcome::Failed(FailureReason::new(e.to_string())),
        }
    }
}
