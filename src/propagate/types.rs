use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Geodetic position and speed of one object at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrbitalState {
    pub norad_id: u32,
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub speed_km_s: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TrajectoryPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Chronological path of one object; instants that failed to propagate are
/// missing, so `points` may be shorter than the requested step count.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrajectorySample {
    pub norad_id: u32,
    pub start: DateTime<Utc>,
    pub duration_minutes: f64,
    pub steps: usize,
    pub points: Vec<TrajectoryPoint>,
}
