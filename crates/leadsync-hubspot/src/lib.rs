//! HubSpot CRM gateway: contact and meeting calls with a uniform error shape.

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::HubspotClient;
pub use error::GatewayError;
pub use gateway::CrmGateway;
pub use types::{RemoteLeadRecord, RemoteMeetingRecord};
