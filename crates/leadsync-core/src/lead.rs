//! Lead payloads as produced by the agent, and the HubSpot property maps
//! built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Properties, ValidationError};

pub const LIFECYCLE_STAGE_LEAD: &str = "lead";

/// A lead extracted from an inbound email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
}

impl Lead {
    /// Builds a lead from a property map. `email` is the only required field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when `email` is absent or blank.
    pub fn from_properties(properties: &Properties) -> Result<Self, ValidationError> {
        let field = |name: &str| {
            properties
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };

        let email = field("email").ok_or(ValidationError::MissingField("email"))?;

        Ok(Self {
            email,
            firstname: field("firstname"),
            lastname: field("lastname"),
            phone: field("phone"),
            company: field("company"),
            website: field("website"),
        })
    }

    /// Contact properties in the shape HubSpot expects for a new lead.
    ///
    /// Absent optional fields are sent as empty strings and
    /// `lifecyclestage` is always `"lead"`.
    #[must_use]
    pub fn to_properties(&self) -> Properties {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();

        let mut props = Properties::new();
        props.insert("email".to_owned(), self.email.clone());
        props.insert("firstname".to_owned(), opt(&self.firstname));
        props.insert("lastname".to_owned(), opt(&self.lastname));
        props.insert("phone".to_owned(), opt(&self.phone));
        props.insert("company".to_owned(), opt(&self.company));
        props.insert("website".to_owned(), opt(&self.website));
        props.insert(
            "lifecyclestage".to_owned(),
            LIFECYCLE_STAGE_LEAD.to_owned(),
        );
        props
    }
}

/// An update to an existing HubSpot contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadUpdate {
    pub lead_id: String,
    pub properties: Properties,
}

impl LeadUpdate {
    /// Builds an update touching only the common status fields. `None`
    /// and blank values are left out of the request.
    #[must_use]
    pub fn with_fields(
        lead_id: &str,
        phone: Option<&str>,
        state: Option<&str>,
        lead_status: Option<&str>,
    ) -> Self {
        let mut properties = Properties::new();
        for (key, value) in [
            ("phone", phone),
            ("state", state),
            ("hs_lead_status", lead_status),
        ] {
            if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
                properties.insert(key.to_owned(), v.to_owned());
            }
        }
        Self {
            lead_id: lead_id.trim().to_owned(),
            properties,
        }
    }

    /// Parses `{"lead_id": "...", "properties": {...}}`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] when `lead_id` is absent or blank.
    /// - [`ValidationError::InvalidPayload`] when `properties` is not an object.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let lead_id = payload
            .get("lead_id")
            .and_then(scalar_to_string)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ValidationError::MissingField("lead_id"))?;

        let properties = payload
            .get("properties")
            .and_then(Value::as_object)
            .map(properties_from_object)
            .ok_or_else(|| {
                ValidationError::InvalidPayload(
                    "'properties' must be an object for a lead update".to_owned(),
                )
            })?;

        Ok(Self {
            lead_id,
            properties,
        })
    }
}

/// Extracts the property map from an agent payload.
///
/// Accepts either `{"properties": {...}}` or the flat property object the
/// agent is prompted to produce.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPayload`] when the payload (or its
/// `properties` member) is not a JSON object.
pub fn properties_from_payload(payload: &Value) -> Result<Properties, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::InvalidPayload("payload must be a JSON object".to_owned()))?;

    match object.get("properties") {
        Some(Value::Object(inner)) => Ok(properties_from_object(inner)),
        Some(_) => Err(ValidationError::InvalidPayload(
            "'properties' must be a JSON object".to_owned(),
        )),
        None => Ok(properties_from_object(object)),
    }
}

/// Converts a JSON object into string properties. Strings are kept as is,
/// numbers and booleans are stringified, nulls and nested values are dropped.
#[must_use]
pub fn properties_from_object(object: &Map<String, Value>) -> Properties {
    object
        .iter()
        .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
        .collect()
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
