use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::feed::{ConjunctionFeedSource, FeedError};
use super::parser::parse_feed;
use super::synthetic::synthetic_scenarios;
use super::types::ConjunctionEvent;
use crate::catalog::Catalog;
use crate::fallback::{Fallback, Resolved};

pub const DEFAULT_TRACKED: [u32; 2] = [39089, 32382];

/// Collects feeds for the tracked objects and merges them into one event
/// list, substituting synthetic scenarios when no feed produced anything.
pub struct ConjunctionService {
    source: Arc<dyn ConjunctionFeedSource>,
    catalog: Arc<Catalog>,
    tracked: Vec<u32>,
    timeout: Duration,
}

impl ConjunctionService {
    pub fn new(
        source: Arc<dyn ConjunctionFeedSource>,
        catalog: Arc<Catalog>,
        tracked: Vec<u32>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            catalog,
            tracked,
            timeout,
        }
    }

    pub fn tracked(&self) -> &[u32] {
        &self.tracked
    }

    /// Parsed events per tracked object; objects whose feed failed are
    /// logged and contribute nothing.
    pub async fn collect_feeds(&self, now: DateTime<Utc>) -> Vec<Vec<ConjunctionEvent>> {
        let mut feeds = Vec::with_capacity(self.tracked.len());
        for &norad_id in &self.tracked {
            let fetched = match tokio::time::timeout(self.timeout, self.source.fetch_feed(norad_id)).await {
                Ok(result) => result,
                Err(_) => Err(FeedError::Timeout),
            };
            match fetched {
                Ok(raw) => {
                    let parsed = parse_feed(&raw, norad_id, now);
                    log::info!(
                        "Found {} conjunctions for NORAD {} ({} rows skipped)",
                        parsed.events.len(),
                        norad_id,
                        parsed.skipped
                    );
                    feeds.push(parsed.events);
                }
                Err(e) => log::warn!("Conjunction feed for NORAD {} unavailable: {}", norad_id, e),
            }
        }
        feeds
    }

    pub async fn events(&self, now: DateTime<Utc>) -> Resolved<Vec<ConjunctionEvent>> {
        let feeds = self.collect_feeds(now).await;
        merge(feeds, &self.catalog, now)
    }
}

/// Concatenate feeds; an empty result is replaced by the synthetic scenarios.
pub fn merge(
    feeds: Vec<Vec<ConjunctionEvent>>,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Resolved<Vec<ConjunctionEvent>> {
    let resolved = Fallback::new()
        .then("feeds", || {
            let events: Vec<_> = feeds.into_iter().flatten().collect();
            (!events.is_empty()).then_some(events)
        })
        .then("synthetic", || {
            log::info!("No conjunction data from feeds, using synthetic scenarios");
            Some(synthetic_scenarios(catalog, now))
        })
        .resolve();

    resolved.unwrap_or(Resolved {
        value: Vec::new(),
        source: "none",
    })
}
