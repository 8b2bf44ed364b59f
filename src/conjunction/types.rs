use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::risk::classify;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    /// Tier rank used for ordering, higher is riskier.
    pub fn rank(self) -> u8 {
        match self {
            RiskLevel::High => 3,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 1,
        }
    }
}

/// Predicted close approach between two tracked objects.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ConjunctionEvent {
    pub id: String,
    pub satellite1: String,
    pub satellite2: String,
    pub norad_id1: u32,
    pub norad_id2: u32,
    pub tca: DateTime<Utc>,
    pub min_range_km: f64,
    pub probability: f64,
    pub relative_velocity_km_s: f64,
    pub risk_level: RiskLevel,
}

/// Everything an event carries except its risk level, which is derived.
#[derive(Debug, Clone)]
pub struct EventFields {
    pub id: String,
    pub satellite1: String,
    pub satellite2: String,
    pub norad_id1: u32,
    pub norad_id2: u32,
    pub tca: DateTime<Utc>,
    pub min_range_km: f64,
    pub probability: f64,
    pub relative_velocity_km_s: f64,
}

impl ConjunctionEvent {
    /// The only constructor, so the risk level always agrees with range and
    /// probability.
    pub fn new(fields: EventFields) -> Self {
        Self {
            risk_level: classify(fields.min_range_km, fields.probability),
            id: fields.id,
            satellite1: fields.satellite1,
            satellite2: fields.satellite2,
            norad_id1: fields.norad_id1,
            norad_id2: fields.norad_id2,
            tca: fields.tca,
            min_range_km: fields.min_range_km,
            probability: fields.probability,
            relative_velocity_km_s: fields.relative_velocity_km_s,
        }
    }

    pub fn involves(&self, norad_id: u32) -> bool {
        self.norad_id1 == norad_id || self.norad_id2 == norad_id
    }

    pub fn hours_until(&self, now: DateTime<Utc>) -> f64 {
        (self.tca - now).num_milliseconds() as f64 / 3_600_000.0
    }
}
