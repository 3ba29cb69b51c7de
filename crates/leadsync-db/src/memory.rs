use async_trait::async_trait;
use chrono::Utc;
use leadsync_core::Properties;
use tokio::sync::RwLock;

use crate::leads::{LocalLeadRow, NewLead};
use crate::meetings::{MeetingRow, NewMeeting};
use crate::mirror::LeadMirror;
use crate::StoreError;

/// [`LeadMirror`] held in process memory, with the same constraints as the
/// Postgres schema. Used for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryLeadMirror {
    leads: RwLock<Vec<LocalLeadRow>>,
    meetings: RwLock<Vec<MeetingRow>>,
}

impl InMemoryLeadMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn leads(&self) -> Vec<LocalLeadRow> {
        self.leads.read().await.clone()
    }

    pub async fn meetings(&self) -> Vec<MeetingRow> {
        self.meetings.read().await.clone()
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |n| n + 1)
}

#[async_trait]
impl LeadMirror for InMemoryLeadMirror {
    async fn find_by_email(&self, email: &str) -> Result<Option<LocalLeadRow>, StoreError> {
        let leads = self.leads.read().await;
        Ok(leads.iter().find(|row| row.email == email).cloned())
    }

    async fn find_by_hubspot_id(
        &self,
        hubspot_id: &str,
    ) -> Result<Option<LocalLeadRow>, StoreError> {
        let leads = self.leads.read().await;
        Ok(leads.iter().find(|row| row.hubspot_id == hubspot_id).cloned())
    }

    async fn insert_lead(
        &self,
        hubspot_id: &str,
        properties: &Properties,
    ) -> Result<LocalLeadRow, StoreError> {
        let lead = NewLead::from_properties(hubspot_id, properties)?;
        let mut leads = self.leads.write().await;
        if leads.iter().any(|row| row.hubspot_id == lead.hubspot_id) {
            return Err(StoreError::Conflict(format!(
                "lead {} already mirrored",
                lead.hubspot_id
            )));
        }

        let row = LocalLeadRow {
            id: next_id(leads.len()),
            hubspot_id: lead.hubspot_id,
            email: lead.email,
            firstname: lead.firstname,
            lastname: lead.lastname,
            phone: lead.phone,
            created_at: Utc::now(),
        };
        leads.push(row.clone());
        Ok(row)
    }

    async fn insert_meeting(&self, meeting: &NewMeeting) -> Result<i64, StoreError> {
        if meeting.hubspot_id.trim().is_empty() {
            return Err(StoreError::MissingField("hubspot_id"));
        }
        let leads = self.leads.read().await;
        if !leads.iter().any(|row| row.hubspot_id == meeting.lead_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "lead {} is not mirrored locally",
                meeting.lead_id
            )));
        }

        let mut meetings = self.meetings.write().await;
        if meetings.iter().any(|row| row.hubspot_id == meeting.hubspot_id) {
            return Err(StoreError::Conflict(format!(
                "meeting {} already mirrored",
                meeting.hubspot_id
            )));
        }

        let id = next_id(meetings.len());
        meetings.push(MeetingRow {
            id,
            hubspot_id: meeting.hubspot_id.clone(),
            lead_id: meeting.lead_id.clone(),
            title: meeting.title.clone(),
            start_time: meeting.start_time,
            end_time: meeting.end_time,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(email: &str) -> Properties {
        let mut props = Properties::new();
        props.insert("email".to_owned(), email.to_owned());
        props.insert("firstname".to_owned(), "Ada".to_owned());
        props
    }

    fn meeting(hubspot_id: &str, lead_id: &str) -> NewMeeting {
        NewMeeting {
            hubspot_id: hubspot_id.to_owned(),
            lead_id: lead_id.to_owned(),
            title: Some("Intro".to_owned()),
            start_time: None,
            end_time: None,
        }
    }

    #[tokio::test]
    async fn insert_then_find_by_email_and_id() {
        let mirror = InMemoryLeadMirror::new();
        let row = mirror.insert_lead("42", &props("a@b.c")).await.unwrap();
        assert_eq!(row.id, 1);

        let by_email = mirror.find_by_email("a@b.c").await.unwrap().unwrap();
        assert_eq!(by_email.hubspot_id, "42");
        let by_id = mirror.find_by_hubspot_id("42").await.unwrap().unwrap();
        assert_eq!(by_id, by_email);
        assert!(mirror.find_by_email("other@b.c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_hubspot_id_conflicts() {
        let mirror = InMemoryLeadMirror::new();
        mirror.insert_lead("42", &props("a@b.c")).await.unwrap();
        let err = mirror.insert_lead("42", &props("x@y.z")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(mirror.leads().await.len(), 1);
    }

    #[tokio::test]
    async fn same_email_twice_returns_earliest() {
        let mirror = InMemoryLeadMirror::new();
        mirror.insert_lead("1", &props("a@b.c")).await.unwrap();
        mirror.insert_lead("2", &props("a@b.c")).await.unwrap();
        let row = mirror.find_by_email("a@b.c").await.unwrap().unwrap();
        assert_eq!(row.hubspot_id, "1");
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let mirror = InMemoryLeadMirror::new();
        let err = mirror
            .insert_lead("42", &Properties::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingField("email")));
    }

    #[tokio::test]
    async fn meeting_requires_mirrored_lead() {
        let mirror = InMemoryLeadMirror::new();
        let err = mirror.insert_meeting(&meeting("m1", "42")).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));

        mirror.insert_lead("42", &props("a@b.c")).await.unwrap();
        let id = mirror.insert_meeting(&meeting("m1", "42")).await.unwrap();
        assert_eq!(id, 1);

        let err = mirror.insert_meeting(&meeting("m1", "42")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
