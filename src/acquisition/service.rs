use std::sync::Arc;
use std::time::Duration;

use super::cache::{ElementSetCache, DEFAULT_FRESHNESS};
use super::error::{OmitReason, UpstreamError};
use super::session::UpstreamSession;
use super::source::ElementSetSource;
use super::types::{BatchReport, CachedElementSet, Credentials, FetchOutcome};

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub request_timeout: Duration,
    pub freshness: chrono::Duration,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            freshness: DEFAULT_FRESHNESS,
        }
    }
}

/// Cache-first element-set acquisition from an authenticated upstream.
///
/// Nothing here returns an error to the caller: every failure becomes an
/// [`OmitReason`] and the caller decides what to substitute.
pub struct AcquisitionService {
    source: Arc<dyn ElementSetSource>,
    session: UpstreamSession,
    cache: ElementSetCache,
    settings: AcquisitionSettings,
}

impl AcquisitionService {
    pub fn new(
        source: Arc<dyn ElementSetSource>,
        credentials: Option<Credentials>,
        settings: AcquisitionSettings,
    ) -> Self {
        Self {
            session: UpstreamSession::new(source.clone(), credentials, settings.request_timeout),
            cache: ElementSetCache::new(settings.freshness),
            source,
            settings,
        }
    }

    pub fn session(&self) -> &UpstreamSession {
        &self.session
    }

    pub fn cache(&self) -> &ElementSetCache {
        &self.cache
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub async fn fetch_one(&self, norad_id: u32) -> Option<CachedElementSet> {
        self.acquire(norad_id).await.into_entry()
    }

    pub async fn acquire(&self, norad_id: u32) -> FetchOutcome {
        if let Some(entry) = self.cache.get_fresh(norad_id) {
            log::debug!("Using cached element set for NORAD {}", norad_id);
            return FetchOutcome::Cached(entry);
        }

        let token = match self.session.ensure().await {
            Ok(token) => token,
            Err(e) => return omit(norad_id, &e),
        };

        let fetched = match tokio::time::timeout(
            self.settings.request_timeout,
            self.source.fetch_latest(&token, norad_id),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout),
        };

        match fetched {
            Ok(Some(record)) => {
                if let Err(e) = record.elements.to_elements(Some(record.name.clone())) {
                    log::warn!("Discarding invalid element set for NORAD {}: {}", norad_id, e);
                    return FetchOutcome::Omitted(OmitReason::InvalidRecord);
                }
                log::debug!("Acquired element set for {} (NORAD {})", record.name, norad_id);
                FetchOutcome::Acquired(self.cache.put(norad_id, record))
            }
            Ok(None) => {
                log::warn!("Upstream has no element set for NORAD {}", norad_id);
                FetchOutcome::Omitted(OmitReason::NotFound)
            }
            Err(UpstreamError::Unauthorized) => {
                self.session.invalidate(&token).await;
                omit(norad_id, &UpstreamError::Unauthorized)
            }
            Err(e) => omit(norad_id, &e),
        }
    }

    /// Fetch `ids` in sequential groups of `batch_size`, concurrently within
    /// a group, pausing `batch_delay` between groups.
    pub async fn fetch_batch(self: &Arc<Self>, ids: &[u32]) -> BatchReport {
        let mut report = BatchReport::default();
        let groups: Vec<&[u32]> = ids.chunks(self.settings.batch_size.max(1)).collect();
        report.groups = groups.len();

        log::info!(
            "Fetching element sets for {} objects in {} groups",
            ids.len(),
            groups.len()
        );

        for (index, group) in groups.iter().enumerate() {
            let handles: Vec<_> = group
                .iter()
                .map(|&norad_id| {
                    let service = Arc::clone(self);
                    (norad_id, tokio::spawn(async move { service.acquire(norad_id).await }))
                })
                .collect();

            // Awaited in input order so each outcome stays paired with its id.
            for (norad_id, handle) in handles {
                match handle.await {
                    Ok(FetchOutcome::Cached(entry)) => {
                        report.cache_hits += 1;
                        report.acquired.insert(norad_id, entry);
                    }
                    Ok(FetchOutcome::Acquired(entry)) => {
                        report.acquired.insert(norad_id, entry);
                    }
                    Ok(FetchOutcome::Omitted(reason)) => report.omitted.push((norad_id, reason)),
                    Err(e) => {
                        log::warn!("Fetch task for NORAD {} failed: {}", norad_id, e);
                        report.omitted.push((norad_id, OmitReason::TaskFailed));
                    }
                }
            }

            if index + 1 < groups.len() {
                tokio::time::sleep(self.settings.batch_delay).await;
                report.pauses += 1;
            }
        }

        log::info!(
            "Batch complete: {} acquired ({} from cache), {} omitted",
            report.acquired.len(),
            report.cache_hits,
            report.omitted.len()
        );
        report
    }
}

fn omit(norad_id: u32, err: &UpstreamError) -> FetchOutcome {
    let reason = OmitReason::from(err);
    match reason {
        OmitReason::UpstreamDisabled => {
            log::debug!("Upstream disabled, skipping NORAD {}", norad_id)
        }
        _ => log::warn!("Could not acquire NORAD {}: {}", norad_id, err),
    }
    FetchOutcome::Omitted(reason)
}
