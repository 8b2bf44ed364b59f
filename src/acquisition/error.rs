use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("upstream credentials not configured")]
    CredentialsMissing,
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("request rejected as unauthorized")]
    Unauthorized,
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

/// Why an identifier is missing from an acquisition result.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OmitReason {
    UpstreamDisabled,
    AuthenticationFailed,
    Unauthorized,
    NotFound,
    Network,
    Timeout,
    InvalidRecord,
    TaskFailed,
}

impl From<&UpstreamError> for OmitReason {
    fn from(err: &UpstreamError) -> Self {
        match err {
            UpstreamError::CredentialsMissing => OmitReason::UpstreamDisabled,
            UpstreamError::AuthenticationFailed(_) => OmitReason::AuthenticationFailed,
            UpstreamError::Unauthorized => OmitReason::Unauthorized,
            UpstreamError::Network(_) => OmitReason::Network,
            UpstreamError::Timeout => OmitReason::Timeout,
            UpstreamError::Decode(_) => OmitReason::InvalidRecord,
        }
    }
}
