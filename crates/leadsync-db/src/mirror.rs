//! The local lead mirror seam used by the flows.

use async_trait::async_trait;
use leadsync_core::Properties;
use sqlx::PgPool;

use crate::leads::{self, LocalLeadRow, NewLead};
use crate::meetings::{self, NewMeeting};
use crate::StoreError;

/// Read and write access to the mirrored leads and meetings.
#[async_trait]
pub trait LeadMirror: Send + Sync {
    /// Earliest mirrored lead with exactly this email.
    async fn find_by_email(&self, email: &str) -> Result<Option<LocalLeadRow>, StoreError>;

    async fn find_by_hubspot_id(
        &self,
        hubspot_id: &str,
    ) -> Result<Option<LocalLeadRow>, StoreError>;

    /// Mirrors a contact HubSpot has already created.
    async fn insert_lead(
        &self,
        hubspot_id: &str,
        properties: &Properties,
    ) -> Result<LocalLeadRow, StoreError>;

    /// Mirrors a meeting for an already-mirrored lead; returns the local id.
    async fn insert_meeting(&self, meeting: &NewMeeting) -> Result<i64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// [`LeadMirror`] backed by the Postgres pool.
#[derive(Debug, Clone)]
pub struct PgLeadMirror {
    pool: PgPool,
}

impl PgLeadMirror {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LeadMirror for PgLeadMirror {
    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<LocalLeadRow>, StoreError> {
        leads::find_lead_by_email(&self.pool, email).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_hubspot_id(
        &self,
        hubspot_id: &str,
    ) -> Result<Option<LocalLeadRow>, StoreError> {
        leads::get_lead_by_hubspot_id(&self.pool, hubspot_id).await
    }

    #[tracing::instrument(skip(self, properties))]
    async fn insert_lead(
        &self,
        hubspot_id: &str,
        properties: &Properties,
    ) -> Result<LocalLeadRow, StoreError> {
        let lead = NewLead::from_properties(hubspot_id, properties)?;
        let row = leads::insert_lead(&self.pool, &lead).await?;
        tracing::info!(local_id = row.id, "lead mirrored");
        Ok(row)
    }

    #[tracing::instrument(skip_all, fields(hubspot_id = %meeting.hubspot_id, lead_id = %meeting.lead_id))]
    async fn insert_meeting(&self, meeting: &NewMeeting) -> Result<i64, StoreError> {
        let id = meetings::insert_meeting(&self.pool, meeting).await?;
        tracing::info!(local_id = id, "meeting mirrored");
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::ping(&self.pool).await
    }
}
