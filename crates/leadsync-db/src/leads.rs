//! Database operations for the `leads` table.

use chrono::{DateTime, Utc};
use leadsync_core::Properties;
use serde::Serialize;
use sqlx::PgPool;

use crate::StoreError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `leads` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LocalLeadRow {
    pub id: i64,
    pub hubspot_id: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Column values for a new `leads` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub hubspot_id: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
}

impl NewLead {
    /// Picks the mirrored columns out of a HubSpot property map.
    ///
    /// Blank values (the lead template sends absent fields as `""`) become
    /// `NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingField`] if `hubspot_id` or `email` is blank.
    pub fn from_properties(hubspot_id: &str, properties: &Properties) -> Result<Self, StoreError> {
        let field = |name: &str| {
            properties
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };

        let hubspot_id = hubspot_id.trim();
        if hubspot_id.is_empty() {
            return Err(StoreError::MissingField("hubspot_id"));
        }

        Ok(Self {
            hubspot_id: hubspot_id.to_owned(),
            email: field("email").ok_or(StoreError::MissingField("email"))?,
            firstname: field("firstname"),
            lastname: field("lastname"),
            phone: field("phone"),
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const LEAD_COLUMNS: &str = "id, hubspot_id, email, firstname, lastname, phone, created_at";

/// Returns the earliest lead mirrored for `email`, or `None`.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub async fn find_lead_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<LocalLeadRow>, StoreError> {
    let row = sqlx::query_as::<_, LocalLeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads \
         WHERE email = $1 \
         ORDER BY created_at, id \
         LIMIT 1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the lead mirrored for a HubSpot contact id, or `None`.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub async fn get_lead_by_hubspot_id(
    pool: &PgPool,
    hubspot_id: &str,
) -> Result<Option<LocalLeadRow>, StoreError> {
    let row = sqlx::query_as::<_, LocalLeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE hubspot_id = $1"
    ))
    .bind(hubspot_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a lead row and returns it with its generated id.
///
/// # Errors
///
/// Returns [`StoreError::Conflict`] if `hubspot_id` is already mirrored, or
/// another [`StoreError`] if the insert fails.
pub async fn insert_lead(pool: &PgPool, lead: &NewLead) -> Result<LocalLeadRow, StoreError> {
    let row = sqlx::query_as::<_, LocalLeadRow>(&format!(
        "INSERT INTO leads (hubspot_id, email, firstname, lastname, phone) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(&lead.hubspot_id)
    .bind(&lead.email)
    .bind(&lead.firstname)
    .bind(&lead.lastname)
    .bind(&lead.phone)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn new_lead_maps_blank_fields_to_none() {
        let lead = NewLead::from_properties(
            "42",
            &props(&[
                ("email", "ada@example.com"),
                ("firstname", "Ada"),
                ("lastname", ""),
                ("phone", "  "),
                ("company", "Analytical Engines"),
            ]),
        )
        .unwrap();

        assert_eq!(lead.hubspot_id, "42");
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(lead.firstname.as_deref(), Some("Ada"));
        assert_eq!(lead.lastname, None);
        assert_eq!(lead.phone, None);
    }

    #[test]
    fn new_lead_binds_each_field_to_its_own_column() {
        let lead = NewLead::from_properties(
            "7",
            &props(&[
                ("email", "a@b.c"),
                ("firstname", "First"),
                ("lastname", "Last"),
                ("phone", "555"),
            ]),
        )
        .unwrap();

        assert_eq!(lead.firstname.as_deref(), Some("First"));
        assert_eq!(lead.lastname.as_deref(), Some("Last"));
        assert_eq!(lead.phone.as_deref(), Some("555"));
    }

    #[test]
    fn new_lead_requires_email_and_id() {
        let err = NewLead::from_properties("42", &props(&[("firstname", "Ada")])).unwrap_err();
        assert!(matches!(err, StoreError::MissingField("email")));

        let err = NewLead::from_properties(" ", &props(&[("email", "a@b.c")])).unwrap_err();
        assert!(matches!(err, StoreError::MissingField("hubspot_id")));
    }
}
