use std::sync::Arc;

use thiserror::Error;

use crate::acquisition::{AcquisitionService, ElementSetSource, SpaceTrackClient, UpstreamError};
use crate::catalog::Catalog;
use crate::config::{Config, ConfigError};
use crate::conjunction::{ConjunctionFeedSource, ConjunctionService, FeedError, SocratesClient};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("upstream client: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("conjunction feed client: {0}")]
    Feed(#[from] FeedError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub acquisition: Arc<AcquisitionService>,
    pub conjunctions: Arc<ConjunctionService>,
}

impl AppState {
    /// Wire the production upstream and feed clients from `config`.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let settings = config.acquisition_settings()?;
        let catalog = Arc::new(Catalog::builtin());

        let credentials = config.credentials();
        let upstream: Arc<dyn ElementSetSource> = Arc::new(SpaceTrackClient::new(
            &config.upstream.base_url,
            settings.request_timeout,
        )?);
        let acquisition = AcquisitionService::new(upstream, credentials, settings);

        let feed: Arc<dyn ConjunctionFeedSource> = Arc::new(SocratesClient::new(
            &config.conjunctions.feed_url,
            config.upstream.request_timeout,
        )?);
        let conjunctions = ConjunctionService::new(
            feed,
            catalog.clone(),
            config.conjunctions.tracked.clone(),
            config.upstream.request_timeout,
        );

        Ok(Self {
            catalog,
            acquisition: Arc::new(acquisition),
            conjunctions: Arc::new(conjunctions),
        })
    }
}
