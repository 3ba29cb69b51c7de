use thiserror::Error;

/// Errors returned by the HubSpot CRM gateway.
///
/// None of these are retried; callers surface them as structured failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No access token was resolved at construction; no request was sent.
    #[error("HubSpot access token is missing")]
    NoCredential,

    /// Network, TLS or timeout failure before a response status was read.
    #[error("HubSpot API unreachable: {0}")]
    Unreachable(String),

    /// HubSpot answered with a non-2xx status.
    #[error("HubSpot rejected the request with status {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    /// HubSpot answered 2xx but the body was empty, not JSON, or had no `id`.
    #[error("HubSpot returned status {status} without a usable record: {body}")]
    AmbiguousSuccess { status: u16, body: String },

    /// An object id was required but empty.
    #[error("object id is required")]
    MissingId,

    #[error("invalid HubSpot base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying `reqwest::Client` could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl GatewayError {
    /// Short machine-readable name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoCredential => "no_credential",
            Self::Unreachable(_) => "unreachable",
            Self::RemoteRejected { .. } => "remote_rejected",
            Self::AmbiguousSuccess { .. } => "ambiguous_success",
            Self::MissingId => "missing_id",
            Self::InvalidBaseUrl { .. } => "invalid_base_url",
            Self::ClientBuild(_) => "client_build",
        }
    }

    /// HTTP status when HubSpot produced one.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejected { status, .. } | Self::AmbiguousSuccess { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Response body when HubSpot produced one.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::RemoteRejected { body, .. } | Self::AmbiguousSuccess { body, .. } => {
                Some(body.as_str())
            }
            _ => None,
        }
    }
}
