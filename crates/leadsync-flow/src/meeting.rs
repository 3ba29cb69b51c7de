use leadsync_core::MeetingRequest;
use leadsync_db::NewMeeting;
use serde_json::Value;

use crate::outcome::{FailureReason, MeetingOutcome};
use crate::LeadFlow;

impl LeadFlow {
    /// Creates a meeting in HubSpot, then mirrors it when it is associated
    /// with exactly one contact.
    #[tracing::instrument(skip_all, fields(hubspot_id = tracing::field::Empty))]
    pub async fn create_meeting(&self, request: &MeetingRequest) -> MeetingOutcome {
        let remote = match self
            .gateway
            .create_meeting(&request.properties, &request.associations)
            .await
        {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "HubSpot meeting creation failed");
                return MeetingOutcome::Failed(FailureReason::from_gateway(&e));
            }
        };
        tracing::Span::current().record("hubspot_id", remote.hubspot_id.as_str());

        let Some(contact_id) = request.single_contact_id() else {
            tracing::info!(
                associations = request.associations.len(),
                "meeting not linked to a single contact; skipping mirror"
            );
            return MeetingOutcome::Unlinked {
                remote_id: remote.hubspot_id,
            };
        };

        let meeting = NewMeeting {
            hubspot_id: remote.hubspot_id.clone(),
            lead_id: contact_id.to_owned(),
            title: request.title().map(str::to_owned),
            start_time: request.start_time(),
            end_time: request.end_time(),
        };

        match self.mirror.insert_meeting(&meeting).await {
            Ok(local_id) => MeetingOutcome::Success {
                remote_id: remote.hubspot_id,
                local_id,
            },
            Err(e) => {
                tracing::error!(error = %e, "meeting created in HubSpot but mirror write failed");
                MeetingOutcome::PartialSuccess {
                    remote_id: remote.hubspot_id,
                    local_error: e.to_string(),
                }
            }
        }
    }

    /// [`LeadFlow::create_meeting`] for a raw `{"properties", "associations"}`
    /// payload.
    pub async fn create_meeting_from_payload(&self, payload: &Value) -> MeetingOutcome {
        match MeetingRequest::from_payload(payload) {
            Ok(request) => self.create_meeting(&request).await,
            Err(e) => MeetingOutcome::Failed(FailureReason::new(e.to_string())),
        }
    }
}
