use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use super::error::PropagateError;
use super::geodesy::{ecef_to_geodetic, magnitude, teme_to_ecef_position};
use super::types::{OrbitalState, TrajectoryPoint, TrajectorySample};
use crate::catalog::CatalogEntry;

pub const DEFAULT_DURATION_MINUTES: f64 = 100.0;
pub const DEFAULT_STEPS: usize = 100;

/// Parsed element set ready for repeated evaluation.
pub struct Propagator {
    norad_id: u32,
    name: String,
    elements: Elements,
    constants: Constants,
}

impl Propagator {
    pub fn new(entry: &CatalogEntry) -> Result<Self, PropagateError> {
        let elements = entry.elements.to_elements(Some(entry.name.clone()))?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            norad_id: entry.norad_id,
            name: entry.name.clone(),
            elements,
            constants,
        })
    }

    pub fn state_at(&self, instant: DateTime<Utc>) -> Result<OrbitalState, PropagateError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&instant.naive_utc())
            .map_err(|e| PropagateError::Propagation(e.to_string()))?;
        let prediction = self.constants.propagate(minutes)?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&instant.naive_utc()));

        self.state_from_teme(prediction.position, prediction.velocity, sidereal, instant)
    }

    fn state_from_teme(
        &self,
        position: [f64; 3],
        velocity: [f64; 3],
        sidereal: f64,
        instant: DateTime<Utc>,
    ) -> Result<OrbitalState, PropagateError> {
        if position.iter().chain(velocity.iter()).any(|v| !v.is_finite()) {
            return Err(PropagateError::Propagation("non-finite state vector".into()));
        }

        let (latitude_deg, longitude_deg, altitude_km) =
            ecef_to_geodetic(teme_to_ecef_position(position, sidereal));
        if altitude_km < 0.0 {
            return Err(PropagateError::Decayed(altitude_km));
        }

        Ok(OrbitalState {
            norad_id: self.norad_id,
            name: self.name.clone(),
            latitude_deg,
            longitude_deg,
            altitude_km,
            speed_km_s: magnitude(velocity),
            timestamp: instant,
        })
    }
}

/// Orbital state of `entry` at `instant`, or `None` when the element set
/// cannot be evaluated there.
pub fn propagate(entry: &CatalogEntry, instant: DateTime<Utc>) -> Option<OrbitalState> {
    let result = Propagator::new(entry).and_then(|p| p.state_at(instant));
    match result {
        Ok(state) => Some(state),
        Err(e) => {
            log::debug!("No state for {} at {}: {}", entry.name, instant, e);
            None
        }
    }
}

/// States for every entry that propagates at `instant`, in input order.
pub fn propagate_catalog(entries: &[CatalogEntry], instant: DateTime<Utc>) -> Vec<OrbitalState> {
    entries
        .iter()
        .filter_map(|entry| propagate(entry, instant))
        .collect()
}

/// Evaluate `steps` equally spaced instants over `duration_minutes` from
/// `start`, skipping instants that do not propagate.
pub fn sample_trajectory(
    entry: &CatalogEntry,
    start: DateTime<Utc>,
    duration_minutes: f64,
    steps: usize,
) -> TrajectorySample {
    let mut sample = TrajectorySample {
        norad_id: entry.norad_id,
        start,
        duration_minutes,
        steps,
        points: Vec::with_capacity(steps),
    };

    let propagator = match Propagator::new(entry) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Cannot sample trajectory for {}: {}", entry.name, e);
            return sample;
        }
    };

    if steps == 0 {
        return sample;
    }
    let step_ms = duration_minutes * 60_000.0 / steps as f64;

    for i in 0..steps {
        // Offsets past the representable date range are dropped.
        let Some(instant) = Duration::try_milliseconds((step_ms * i as f64).round() as i64)
            .and_then(|offset| start.checked_add_signed(offset))
        else {
            continue;
        };
        if let Ok(state) = propagator.state_at(instant) {
            sample.points.push(TrajectoryPoint {
                latitude_deg: state.latitude_deg,
                longitude_deg: state.longitude_deg,
                altitude_km: state.altitude_km,
            });
        }
    }

    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{synthesize, Catalog, ElementSet};
    use chrono::TimeZone;

    fn fresh_entry(norad_id: u32, now: DateTime<Utc>) -> CatalogEntry {
        let catalog = Catalog::builtin();
        let entry = catalog.get(norad_id).unwrap();
        entry.with_elements(synthesize(entry, now))
    }

    #[test]
    fn low_earth_orbit_state_is_plausible() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let state = propagate(&fresh_entry(39089, now), now).expect("propagates");

        assert_eq!(state.norad_id, 39089);
        assert_eq!(state.name, "SAPPHIRE");
        assert!((700.0..1100.0).contains(&state.altitude_km), "{}", state.altitude_km);
        assert!((7.0..7.8).contains(&state.speed_km_s), "{}", state.speed_km_s);
        assert!((-90.0..=90.0).contains(&state.latitude_deg));
        assert!((-180.0..=180.0).contains(&state.longitude_deg));
        assert_eq!(state.timestamp, now);
    }

    #[test]
    fn geostationary_state_is_plausible() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let state = propagate(&fresh_entry(44878, now), now).expect("propagates");
        assert!((35_000.0..36_600.0).contains(&state.altitude_km), "{}", state.altitude_km);
        assert!(state.latitude_deg.abs() < 1.0);
    }

    #[test]
    fn malformed_elements_are_absent() {
        let now = Utc::now();
        let entry = fresh_entry(39089, now).with_elements(ElementSet::new("1 bad", "2 bad"));
        assert!(propagate(&entry, now).is_none());
        assert!(sample_trajectory(&entry, now, 100.0, 100).points.is_empty());
    }

    #[test]
    fn state_below_surface_is_decayed() {
        let now = Utc::now();
        let propagator = Propagator::new(&fresh_entry(39089, now)).unwrap();
        let result = propagator.state_from_teme([3000.0, 0.0, 0.0], [0.0, 7.0, 0.0], 0.0, now);
        assert!(matches!(result, Err(PropagateError::Decayed(_))));
    }

    #[test]
    fn catalog_propagation_skips_entries_that_fail() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let good = fresh_entry(32382, now);
        let bad = good.with_elements(ElementSet::new("x", "y"));
        let states = propagate_catalog(&[good, bad, fresh_entry(27843, now)], now);
        assert_eq!(
            states.iter().map(|s| s.norad_id).collect::<Vec<_>>(),
            vec![32382, 27843]
        );
    }

    #[test]
    fn trajectory_has_one_point_per_step_in_order() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let entry = fresh_entry(46484, start);
        let sample = sample_trajectory(&entry, start, DEFAULT_DURATION_MINUTES, DEFAULT_STEPS);

        assert_eq!(sample.points.len(), DEFAULT_STEPS);
        let first = propagate(&entry, start).unwrap();
        assert_eq!(sample.points[0].latitude_deg, first.latitude_deg);

        let one_step = start + Duration::minutes(1);
        let second = propagate(&entry, one_step).unwrap();
        assert!((sample.points[1].longitude_deg - second.longitude_deg).abs() < 1e-9);
    }

    #[test]
    fn unrepresentable_instants_are_skipped() {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let entry = fresh_entry(39089, start);

        let sample = sample_trajectory(&entry, start, 1e12, 100);
        assert!(sample.points.len() < 100);

        let sample = sample_trajectory(&entry, start, f64::MAX, 10);
        assert!(sample.points.len() <= 10);
    }

    #[test]
    fn zero_steps_yield_empty_path() {
        let start = Utc::now();
        let sample = sample_trajectory(&fresh_entry(39089, start), start, 100.0, 0);
        assert!(sample.points.is_empty());
        assert_eq!(sample.steps, 0);
    }
}
