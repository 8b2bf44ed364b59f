use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use super::error::UpstreamError;
use super::source::ElementSetSource;
use super::types::{Credentials, SessionToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Disabled,
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Authenticated session with the element-set source.
///
/// The token lock is held across the login exchange so concurrent callers
/// wait for one login instead of racing their own.
pub struct UpstreamSession {
    credentials: Option<Credentials>,
    source: Arc<dyn ElementSetSource>,
    timeout: Duration,
    token: Mutex<Option<SessionToken>>,
    // Mirrors of the token state so `phase` never waits on the lock.
    has_token: AtomicBool,
    logging_in: AtomicBool,
    disabled_logged: AtomicBool,
}

/// Clears the login flag even if the login future is dropped.
struct LoginFlag<'a>(&'a AtomicBool);

impl<'a> LoginFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoginFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UpstreamSession {
    pub fn new(
        source: Arc<dyn ElementSetSource>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Self {
        Self {
            credentials,
            source,
            timeout,
            token: Mutex::new(None),
            has_token: AtomicBool::new(false),
            logging_in: AtomicBool::new(false),
            disabled_logged: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.is_enabled() {
            return SessionPhase::Disabled;
        }
        if self.logging_in.load(Ordering::SeqCst) {
            SessionPhase::Authenticating
        } else if self.has_token.load(Ordering::SeqCst) {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    /// Return the current token, logging in first if there is none.
    pub async fn ensure(&self) -> Result<SessionToken, UpstreamError> {
        let Some(credentials) = self.credentials.as_ref() else {
            if !self.disabled_logged.swap(true, Ordering::Relaxed) {
                log::info!("Upstream credentials not configured, element sets will be synthetic");
            }
            return Err(UpstreamError::CredentialsMissing);
        };

        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref() {
            return Ok(current.clone());
        }

        log::info!("Authenticating with upstream element-set source");
        let flag = LoginFlag::raise(&self.logging_in);
        let login = match tokio::time::timeout(self.timeout, self.source.login(credentials)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout),
        };

        match login {
            Ok(new_token) => {
                log::info!("Upstream session established");
                *token = Some(new_token.clone());
                self.has_token.store(true, Ordering::SeqCst);
                drop(flag);
                Ok(new_token)
            }
            Err(e) => {
                log::warn!("Upstream authentication failed: {}", e);
                Err(match e {
                    UpstreamError::AuthenticationFailed(msg) => {
                        UpstreamError::AuthenticationFailed(msg)
                    }
                    other => UpstreamError::AuthenticationFailed(other.to_string()),
                })
            }
        }
    }

    /// Drop `rejected` so the next caller logs in again. A token that was
    /// already replaced by a newer login is left alone.
    pub async fn invalidate(&self, rejected: &SessionToken) {
        let mut token = self.token.lock().await;
        if token.as_ref() == Some(rejected) {
            log::info!("Upstream session rejected, will re-authenticate on next request");
            *token = None;
            self.has_token.store(false, Ordering::SeqCst);
        }
    }
}
