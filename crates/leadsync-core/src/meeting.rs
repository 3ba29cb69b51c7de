//! Meeting requests and their contact associations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lead::{properties_from_object, scalar_to_string};
use crate::{Properties, ValidationError};

/// Association type id used when linking a meeting to a contact.
pub const CONTACT_MEETING_ASSOCIATION_TYPE_ID: u32 = 191;
pub const HUBSPOT_DEFINED: &str = "HUBSPOT_DEFINED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub to: AssociationTarget,
    pub types: Vec<AssociationType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationTarget {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationType {
    pub association_category: String,
    pub association_type_id: u32,
}

impl Association {
    /// Meeting-to-contact association for the given HubSpot contact id.
    #[must_use]
    pub fn contact(contact_id: &str) -> Self {
        Self {
            to: AssociationTarget {
                id: contact_id.to_owned(),
            },
            types: vec![AssociationType {
                association_category: HUBSPOT_DEFINED.to_owned(),
                association_type_id: CONTACT_MEETING_ASSOCIATION_TYPE_ID,
            }],
        }
    }
}

/// A meeting to create in HubSpot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub properties: Properties,
    pub associations: Vec<Association>,
}

impl MeetingRequest {
    /// Builds a meeting linked to a single contact.
    #[must_use]
    pub fn for_contact(
        contact_id: &str,
        title: &str,
        body: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let mut properties = Properties::new();
        properties.insert("hs_timestamp".to_owned(), start.to_rfc3339());
        properties.insert("hs_meeting_title".to_owned(), title.to_owned());
        properties.insert("hs_meeting_body".to_owned(), body.to_owned());
        properties.insert("hs_meeting_start_time".to_owned(), start.to_rfc3339());
        properties.insert("hs_meeting_end_time".to_owned(), end.to_rfc3339());

        Self {
            properties,
            associations: vec![Association::contact(contact_id)],
        }
    }

    /// Parses `{"properties": {...}, "associations": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPayload`] when `properties` is not an
    /// object or an association is malformed.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let properties = payload
            .get("properties")
            .and_then(Value::as_object)
            .map(properties_from_object)
            .ok_or_else(|| {
                ValidationError::InvalidPayload("'properties' must be an object".to_owned())
            })?;

        let associations = match payload.get("associations") {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value::<Vec<Association>>(raw.clone())
                .map_err(|e| ValidationError::InvalidPayload(format!("associations: {e}")))?,
        };

        Ok(Self {
            properties,
            associations,
        })
    }

    /// The contact id when the meeting is associated with exactly one contact.
    #[must_use]
    pub fn single_contact_id(&self) -> Option<&str> {
        match self.associations.as_slice() {
            [only] if !only.to.id.trim().is_empty() => Some(only.to.id.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.properties.get("hs_meeting_title").map(String::as_str)
    }

    /// Start time from `hs_meeting_start_time`, falling back to `hs_timestamp`.
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.properties
            .get("hs_meeting_start_time")
            .or_else(|| self.properties.get("hs_timestamp"))
            .and_then(|raw| parse_hubspot_timestamp(raw))
    }

    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.properties
            .get("hs_meeting_end_time")
            .and_then(|raw| parse_hubspot_timestamp(raw))
    }
}

/// HubSpot accepts RFC 3339 strings or epoch milliseconds.
#[must_use]
pub fn parse_hubspot_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| serde::de::Error::custom("association id must be a string or number"))
}
