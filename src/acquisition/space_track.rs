use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde::Deserialize;

use super::error::UpstreamError;
use super::source::ElementSetSource;
use super::types::{Credentials, ElementRecord, SessionToken};
use crate::catalog::ElementSet;

pub const DEFAULT_BASE_URL: &str = "https://www.space-track.org";
const SESSION_COOKIE: &str = "spacetrack_csrf_token";

/// Space-Track general-perturbations client.
pub struct SpaceTrackClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GpRecord {
    #[serde(rename = "NORAD_CAT_ID", deserialize_with = "string_or_number")]
    norad_cat_id: String,
    #[serde(rename = "OBJECT_NAME", default)]
    object_name: Option<String>,
    #[serde(rename = "TLE_LINE1")]
    tle_line1: String,
    #[serde(rename = "TLE_LINE2")]
    tle_line2: String,
}

impl SpaceTrackClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn latest_gp_url(&self, norad_id: u32) -> String {
        format!(
            "{}/basicspacedata/query/class/gp/NORAD_CAT_ID/{}/orderby/EPOCH%20desc/limit/1/format/json",
            self.base_url, norad_id
        )
    }
}

#[async_trait]
impl ElementSetSource for SpaceTrackClient {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, UpstreamError> {
        let response = self
            .http
            .post(format!("{}/ajaxauth/login", self.base_url))
            .form(&[
                ("identity", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::AuthenticationFailed(format!(
                "login returned HTTP {}",
                response.status()
            )));
        }

        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(session_cookie)
            .map(SessionToken)
            .ok_or_else(|| UpstreamError::AuthenticationFailed("no session cookie in login response".into()))
    }

    async fn fetch_latest(
        &self,
        token: &SessionToken,
        norad_id: u32,
    ) -> Result<Option<ElementRecord>, UpstreamError> {
        let response = self
            .http
            .get(self.latest_gp_url(norad_id))
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, token.0))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(UpstreamError::Unauthorized)
            }
            status if !status.is_success() => {
                return Err(UpstreamError::Network(format!("HTTP {}", status)))
            }
            _ => {}
        }

        let records: Vec<GpRecord> = response.json().await?;
        records
            .into_iter()
            .next()
            .map(|r| into_element_record(r, norad_id))
            .transpose()
    }
}

fn into_element_record(record: GpRecord, requested: u32) -> Result<ElementRecord, UpstreamError> {
    let norad_id = record
        .norad_cat_id
        .trim()
        .parse()
        .map_err(|_| UpstreamError::Decode(format!("bad NORAD_CAT_ID '{}'", record.norad_cat_id)))?;
    if norad_id != requested {
        log::warn!("Requested NORAD {} but upstream answered with {}", requested, norad_id);
    }
    Ok(ElementRecord {
        norad_id,
        name: record
            .object_name
            .unwrap_or_else(|| format!("NORAD {}", norad_id)),
        elements: ElementSet::new(record.tle_line1.trim(), record.tle_line2.trim()),
    })
}

fn session_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
