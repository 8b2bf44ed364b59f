use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::acquisition::{AcquisitionService, BatchReport};
use crate::catalog::{synthesize, Catalog, CatalogEntry, ElementSet};
use crate::fallback::Fallback;

/// Catalog entry carrying the element set actually in use.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResolvedEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    /// `upstream` or `synthetic`.
    #[schema(value_type = String)]
    pub source: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResolvedElementSet {
    pub name: String,
    #[serde(flatten)]
    pub elements: ElementSet,
    #[schema(value_type = String)]
    pub source: &'static str,
}

async fn acquire(acquisition: &Arc<AcquisitionService>, ids: &[u32]) -> BatchReport {
    if !acquisition.session().is_enabled() {
        log::debug!("Upstream disabled, resolving {} objects synthetically", ids.len());
        return BatchReport::default();
    }
    acquisition.fetch_batch(ids).await
}

/// Element sets for the whole catalog: upstream where acquired, otherwise
/// synthesized at `now`.
pub async fn resolve_catalog(
    acquisition: &Arc<AcquisitionService>,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Vec<ResolvedEntry> {
    let report = acquire(acquisition, &catalog.ids()).await;

    catalog
        .entries()
        .iter()
        .filter_map(|entry| {
            Fallback::new()
                .then("upstream", || {
                    report
                        .acquired
                        .get(&entry.norad_id)
                        .map(|cached| entry.with_elements(cached.elements.clone()))
                })
                .then("synthetic", || Some(entry.with_elements(synthesize(entry, now))))
                .resolve()
                .map(|resolved| ResolvedEntry {
                    entry: resolved.value,
                    source: resolved.source,
                })
        })
        .collect()
}

/// Element sets for arbitrary identifiers. Ids the upstream could not
/// supply are synthesized when the catalog knows them and left out otherwise.
pub async fn resolve_ids(
    acquisition: &Arc<AcquisitionService>,
    catalog: &Catalog,
    ids: &[u32],
    now: DateTime<Utc>,
) -> BTreeMap<u32, ResolvedElementSet> {
    let report = acquire(acquisition, ids).await;

    ids.iter()
        .filter_map(|&norad_id| {
            Fallback::new()
                .then("upstream", || {
                    report.acquired.get(&norad_id).map(|cached| {
                        (cached.name.clone(), cached.elements.clone())
                    })
                })
                .then("synthetic", || {
                    catalog
                        .get(norad_id)
                        .map(|entry| (entry.name.clone(), synthesize(entry, now)))
                })
                .resolve()
                .map(|resolved| {
                    let (name, elements) = resolved.value;
                    (
                        norad_id,
                        ResolvedElementSet {
                            name,
                            elements,
                            source: resolved.source,
                        },
                    )
                })
        })
        .collect()
}
