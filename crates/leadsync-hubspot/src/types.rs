use leadsync_core::Properties;
use serde::Serialize;

/// A contact as HubSpot reports it after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteLeadRecord {
    pub hubspot_id: String,
    pub properties: Properties,
}

/// A meeting engagement as HubSpot reports it after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteMeetingRecord {
    pub hubspot_id: String,
    pub properties: Properties,
}
