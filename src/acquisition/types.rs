use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::OmitReason;
use crate::catalog::ElementSet;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both values must be present and non-empty, otherwise upstream is disabled.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Self { username, password })
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

/// Most recent element set for one object as returned by the upstream source.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    pub norad_id: u32,
    pub name: String,
    pub elements: ElementSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CachedElementSet {
    pub norad_id: u32,
    pub name: String,
    #[serde(flatten)]
    pub elements: ElementSet,
    pub acquired_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Served from the cache without touching upstream.
    Cached(CachedElementSet),
    Acquired(CachedElementSet),
    Omitted(OmitReason),
}

impl FetchOutcome {
    pub fn into_entry(self) -> Option<CachedElementSet> {
        match self {
            FetchOutcome::Cached(entry) | FetchOutcome::Acquired(entry) => Some(entry),
            FetchOutcome::Omitted(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub acquired: BTreeMap<u32, CachedElementSet>,
    pub omitted: Vec<(u32, OmitReason)>,
    pub cache_hits: usize,
    pub groups: usize,
    pub pauses: usize,
}
