//! Database operations for the `meetings` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::StoreError;

/// A row from the `meetings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MeetingRow {
    pub id: i64,
    pub hubspot_id: String,
    pub lead_id: String,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Column values for a new `meetings` row. `lead_id` is the HubSpot id of
/// the contact the meeting belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeeting {
    pub hubspot_id: String,
    pub lead_id: String,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Inserts a meeting for an already-mirrored lead and returns its local id.
///
/// The lead lookup and the insert share one transaction; it is rolled back
/// when dropped on any error path.
///
/// # Errors
///
/// Returns [`StoreError::ForeignKeyViolation`] if `lead_id` is not mirrored,
/// [`StoreError::Conflict`] if the meeting's `hubspot_id` already exists, or
/// another [`StoreError`] if a query fails.
pub async fn insert_meeting(pool: &PgPool, meeting: &NewMeeting) -> Result<i64, StoreError> {
    if meeting.hubspot_id.trim().is_empty() {
        return Err(StoreError::MissingField("hubspot_id"));
    }

    let mut tx = pool.begin().await?;

    let lead_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM leads WHERE hubspot_id = $1)")
            .bind(&meeting.lead_id)
            .fetch_one(&mut *tx)
            .await?;
    if !lead_exists {
        return Err(StoreError::ForeignKeyViolation(format!(
            "lead {} is not mirrored locally",
            meeting.lead_id
        )));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO meetings (hubspot_id, lead_id, title, start_time, end_time) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id",
    )
    .bind(&meeting.hubspot_id)
    .bind(&meeting.lead_id)
    .bind(&meeting.title)
    .bind(meeting.start_time)
    .bind(meeting.end_time)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// Lists meetings for a lead, oldest first.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub async fn list_meetings_for_lead(
    pool: &PgPool,
    lead_id: &str,
) -> Result<Vec<MeetingRow>, StoreError> {
    let rows = sqlx::query_as::<_, MeetingRow>(
        "SELECT id, hubspot_id, lead_id, title, start_time, end_time, created_at \
         FROM meetings \
         WHERE lead_id = $1 \
         ORDER BY created_at, id",
    )
    .bind(lead_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
