use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::error::UpstreamError;
use super::source::ElementSetSource;
use super::types::{Credentials, ElementRecord, SessionToken};
use crate::catalog::{synthesize, Catalog};

/// In-memory element-set source with scriptable failures.
#[derive(Default)]
pub struct FakeSource {
    records: Mutex<HashMap<u32, ElementRecord>>,
    delays: Mutex<HashMap<u32, Duration>>,
    hanging: Mutex<HashSet<u32>>,
    failing: Mutex<HashSet<u32>>,
    reject_once: Mutex<HashSet<u32>>,
    fail_logins: AtomicBool,
    login_delay: Mutex<Option<Duration>>,
    logins: AtomicUsize,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSource {
    /// Source holding a valid record for every built-in catalog object.
    pub fn with_catalog() -> Self {
        let source = Self::default();
        let now = Utc::now();
        for entry in Catalog::builtin().entries() {
            source.insert(ElementRecord {
                norad_id: entry.norad_id,
                name: entry.name.clone(),
                elements: synthesize(entry, now),
            });
        }
        source
    }

    pub fn insert(&self, record: ElementRecord) {
        self.records.lock().unwrap().insert(record.norad_id, record);
    }

    pub fn delay(&self, norad_id: u32, delay: Duration) {
        self.delays.lock().unwrap().insert(norad_id, delay);
    }

    pub fn hang(&self, norad_id: u32) {
        self.hanging.lock().unwrap().insert(norad_id);
    }

    pub fn fail(&self, norad_id: u32) {
        self.failing.lock().unwrap().insert(norad_id);
    }

    pub fn reject_once(&self, norad_id: u32) {
        self.reject_once.lock().unwrap().insert(norad_id);
    }

    pub fn fail_logins(&self, fail: bool) {
        self.fail_logins.store(fail, Ordering::SeqCst);
    }

    pub fn delay_logins(&self, delay: Duration) {
        *self.login_delay.lock().unwrap() = Some(delay);
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, norad_id: u32) -> Result<Option<ElementRecord>, UpstreamError> {
        if self.hanging.lock().unwrap().contains(&norad_id) {
            std::future::pending::<()>().await;
        }
        let delay = self.delays.lock().unwrap().get(&norad_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.reject_once.lock().unwrap().remove(&norad_id) {
            return Err(UpstreamError::Unauthorized);
        }
        if self.failing.lock().unwrap().contains(&norad_id) {
            return Err(UpstreamError::Network("connection reset".into()));
        }
        Ok(self.records.lock().unwrap().get(&norad_id).cloned())
    }
}

#[async_trait]
impl ElementSetSource for FakeSource {
    async fn login(&self, _credentials: &Credentials) -> Result<SessionToken, UpstreamError> {
        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = *self.login_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_logins.load(Ordering::SeqCst) {
            return Err(UpstreamError::AuthenticationFailed("bad credentials".into()));
        }
        Ok(SessionToken(format!("token-{}", n)))
    }

    async fn fetch_latest(
        &self,
        _token: &SessionToken,
        norad_id: u32,
    ) -> Result<Option<ElementRecord>, UpstreamError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let result = self.respond(norad_id).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
