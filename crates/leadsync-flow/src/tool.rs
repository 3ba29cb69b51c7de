//! Agent-facing tools: JSON payload in, JSON result string out.
//!
//! Every call yields a result object with a `status` of `success`,
//! `success_hubspot_db_fail` or `error`. Failures never escape as Rust errors.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::outcome::{FailureReason, LeadOutcome, MeetingOutcome, UpdateOutcome};
use crate::LeadFlow;

pub const DUPLICATE_LEAD_MESSAGE: &str = "Lead already exists";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    CreateLead,
    UpdateLead,
    CreateMeeting,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::CreateLead, Tool::UpdateLead, Tool::CreateMeeting];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tool::CreateLead => "create_lead",
            Tool::UpdateLead => "update_lead",
            Tool::CreateMeeting => "create_meeting",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Tool::CreateLead => {
                "Create a HubSpot contact from {\"properties\": {email, firstname, lastname, phone, company, website}} and mirror it locally. Rejects emails that already exist."
            }
            Tool::UpdateLead => {
                "Update a HubSpot contact from {\"lead_id\": ..., \"properties\": {phone, state, hs_lead_status, ...}}."
            }
            Tool::CreateMeeting => {
                "Create a HubSpot meeting from {\"properties\": {hs_timestamp, hs_meeting_title, ...}, \"associations\": [...]} and mirror it when linked to one contact."
            }
        }
    }

    /// Runs the tool against a payload.
    pub async fn invoke(self, flow: &LeadFlow, payload: &Value) -> ToolResult {
        tracing::debug!(tool = self.name(), "invoking tool");
        match self {
            Tool::CreateLead => flow.create_lead_from_payload(payload).await.into(),
            Tool::UpdateLead => flow.update_lead_from_payload(payload).await.into(),
            Tool::CreateMeeting => flow.create_meeting_from_payload(payload).await.into(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| UnknownTool(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    SuccessHubspotDbFail,
    Error,
}

/// The JSON object returned to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub status: ToolStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hubspot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolResult {
    fn new(status: ToolStatus, message: String) -> Self {
        Self {
            status,
            message,
            hubspot_id: None,
            db_id: None,
            http_status: None,
            details: None,
        }
    }

    fn failed(reason: FailureReason) -> Self {
        Self {
            http_status: reason.http_status,
            details: reason.details,
            ..Self::new(ToolStatus::Error, reason.message)
        }
    }

    fn with_hubspot_id(mut self, hubspot_id: String) -> Self {
        self.hubspot_id = Some(hubspot_id);
        self
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToolStatus::Error, message.into())
    }

    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"status":"error","message":"failed to encode tool result: {e}"}}"#)
        })
    }
}

impl From<LeadOutcome> for ToolResult {
    fn from(outcome: LeadOutcome) -> Self {
        match outcome {
            LeadOutcome::Success {
                remote_id,
                local_id,
            } => Self {
                db_id: Some(local_id),
                ..Self::new(
                    ToolStatus::Success,
                    format!("Lead created successfully in HubSpot (ID: {remote_id}) and stored in DB."),
                )
                .with_hubspot_id(remote_id)
            },
            LeadOutcome::PartialSuccess {
                remote_id,
                local_error,
            } => Self::new(
                ToolStatus::SuccessHubspotDbFail,
                format!("Lead created in HubSpot with ID {remote_id}, but DB storage failed: {local_error}"),
            )
            .with_hubspot_id(remote_id),
            LeadOutcome::RejectedDuplicate { remote_id } => {
                Self::error(DUPLICATE_LEAD_MESSAGE).with_hubspot_id(remote_id)
            }
            LeadOutcome::Failed(reason) => Self::failed(reason),
        }
    }
}

impl From<MeetingOutcome> for ToolResult {
    fn from(outcome: MeetingOutcome) -> Self {
        match outcome {
            MeetingOutcome::Success {
                remote_id,
                local_id,
            } => Self {
                db_id: Some(local_id),
                ..Self::new(
                    ToolStatus::Success,
                    format!("Meeting created in HubSpot (ID: {remote_id}) and stored in DB."),
                )
                .with_hubspot_id(remote_id)
            },
            MeetingOutcome::Unlinked { remote_id } => Self::new(
                ToolStatus::Success,
                format!(
                    "Meeting created in HubSpot (ID: {remote_id}); not stored in DB because it is not linked to a single contact."
                ),
            )
            .with_hubspot_id(remote_id),
            MeetingOutcome::PartialSuccess {
                remote_id,
                local_error,
            } => Self::new(
                ToolStatus::SuccessHubspotDbFail,
                format!("Meeting created in HubSpot with ID {remote_id}, but DB storage failed: {local_error}"),
            )
            .with_hubspot_id(remote_id),
            MeetingOutcome::Failed(reason) => Self::failed(reason),
        }
    }
}

impl From<UpdateOutcome> for ToolResult {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Success { remote_id } => Self::new(
                ToolStatus::Success,
                format!("Lead {remote_id} updated in HubSpot."),
            )
            .with_hubspot_id(remote_id),
            UpdateOutcome::Failed(reason) => Self::failed(reason),
        }
    }
}

/// The `create_lead` tool: parses `json_payload` and returns the result as a
/// JSON string.
pub async fn create_lead(flow: &LeadFlow, json_payload: &str) -> String {
    invoke_json(flow, Tool::CreateLead, json_payload).await
}

/// Runs `tool` on a raw JSON string. Malformed JSON becomes an `error` result.
pub async fn invoke_json(flow: &LeadFlow, tool: Tool, json_payload: &str) -> String {
    let result = match serde_json::from_str::<Value>(json_payload) {
        Ok(payload) => tool.invoke(flow, &payload).await,
        Err(e) => ToolResult::error(format!("invalid JSON payload: {e}")),
    };
    result.to_json_string()
}
