use async_trait::async_trait;

use super::error::UpstreamError;
use super::types::{Credentials, ElementRecord, SessionToken};

/// Authenticated upstream that serves the latest element set per object.
#[async_trait]
pub trait ElementSetSource: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, UpstreamError>;

    /// `Ok(None)` when the source has no record for `norad_id`.
    async fn fetch_latest(
        &self,
        token: &SessionToken,
        norad_id: u32,
    ) -> Result<Option<ElementRecord>, UpstreamError>;
}
