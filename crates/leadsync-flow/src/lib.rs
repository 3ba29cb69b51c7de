//! Lead creation, meeting and update flows over the CRM gateway and the
//! local mirror.
//!
//! HubSpot is authoritative. The mirror is written only after HubSpot
//! confirms a record, and a mirror failure degrades the outcome instead of
//! undoing the remote write.
//!
//! Two concurrent `create_lead` calls for the same email can both pass the
//! duplicate check. Nothing here serialises them; the `hubspot_id` unique
//! constraint still keeps mirror rows one-per-contact.

use std::sync::Arc;

use leadsync_db::LeadMirror;
use leadsync_hubspot::CrmGateway;

pub mod bootstrap;
mod lead;
mod meeting;
pub mod outcome;
pub mod tool;
mod update;

pub use bootstrap::{bootstrap, BootstrapError, Runtime};
pub use outcome::{FailureReason, LeadOutcome, MeetingOutcome, UpdateOutcome};
pub use tool::{Tool, ToolResult, ToolStatus, UnknownTool};

/// The dual-write flows, holding one gateway and one mirror for the process.
#[derive(Clone)]
pub struct LeadFlow {
    gateway: Arc<dyn CrmGateway>,
    mirror: Arc<dyn LeadMirror>,
}

impl LeadFlow {
    #[must_use]
    pub fn new(gateway: Arc<dyn CrmGateway>, mirror: Arc<dyn LeadMirror>) -> Self {
        Self { gateway, mirror }
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<dyn CrmGateway> {
        &self.gateway
    }

    #[must_use]
    pub fn mirror(&self) -> &Arc<dyn LeadMirror> {
        &self.mirror
    }
}
