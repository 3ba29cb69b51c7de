use leadsync_hubspot::GatewayError;
use serde::Serialize;

/// Why a flow stopped without creating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    pub message: String,
    /// Status HubSpot answered with, if it answered at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl FailureReason {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http_status: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Describes a gateway error, keeping HubSpot's status and body.
    #[must_use]
    pub fn from_gateway(err: &GatewayError) -> Self {
        let message = match err {
            GatewayError::RemoteRejected { status, .. } => {
                format!("HubSpot rejected the request with status {status}")
            }
            GatewayError::AmbiguousSuccess { status, .. } => {
                format!("HubSpot returned status {status} without a record id")
            }
            other => other.to_string(),
        };
        Self {
            message,
            http_status: err.http_status(),
            details: err.response_body().map(str::to_owned),
        }
    }
}

/// Terminal state of a lead creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadOutcome {
    /// Created in HubSpot and mirrored locally.
    Success { remote_id: String, local_id: i64 },
    /// Created in HubSpot; the mirror write failed and was not retried.
    PartialSuccess {
        remote_id: String,
        local_error: String,
    },
    /// A lead with this email is already mirrored; HubSpot was not called.
    RejectedDuplicate { remote_id: String },
    Failed(FailureReason),
}

/// Terminal state of a meeting creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingOutcome {
    Success { remote_id: String, local_id: i64 },
    /// Created in HubSpot but not linked to exactly one contact, so nothing
    /// was mirrored.
    Unlinked { remote_id: String },
    PartialSuccess {
        remote_id: String,
        local_error: String,
    },
    Failed(FailureReason),
}

/// Terminal state of a contact update. The mirror is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Success { remote_id: String },
    Failed(FailureReason),
}
