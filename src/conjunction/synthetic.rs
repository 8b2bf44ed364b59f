use chrono::{DateTime, Duration, Utc};

use super::types::{ConjunctionEvent, EventFields};
use crate::catalog::Catalog;

struct Scenario {
    primary: u32,
    secondary: u32,
    min_range_km: f64,
    probability: f64,
    hours_from_now: i64,
    relative_velocity_km_s: f64,
}

const SCENARIOS: &[Scenario] = &[
    // SAPPHIRE / RADARSAT-2
    Scenario {
        primary: 39089,
        secondary: 32382,
        min_range_km: 2.5,
        probability: 0.00001,
        hours_from_now: 12,
        relative_velocity_km_s: 12.4,
    },
    // RCM-1 / RCM-2
    Scenario {
        primary: 46484,
        secondary: 46485,
        min_range_km: 5.8,
        probability: 0.000001,
        hours_from_now: 24,
        relative_velocity_km_s: 10.7,
    },
    // RADARSAT-2 / CASSIOPE
    Scenario {
        primary: 32382,
        secondary: 40895,
        min_range_km: 1.2,
        probability: 0.0001,
        hours_from_now: 6,
        relative_velocity_km_s: 14.2,
    },
    // RCM-3 / SCISAT-1
    Scenario {
        primary: 46486,
        secondary: 27843,
        min_range_km: 8.5,
        probability: 0.0000001,
        hours_from_now: 48,
        relative_velocity_km_s: 11.3,
    },
    // SAPPHIRE / M3MSAT
    Scenario {
        primary: 39089,
        secondary: 43616,
        min_range_km: 0.8,
        probability: 0.001,
        hours_from_now: 3,
        relative_velocity_km_s: 13.6,
    },
];

/// Fixed demonstration events relative to `now`, ordered by TCA.
pub fn synthetic_scenarios(catalog: &Catalog, now: DateTime<Utc>) -> Vec<ConjunctionEvent> {
    let mut events: Vec<ConjunctionEvent> = SCENARIOS
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let primary = catalog.get(s.primary)?;
            let secondary = catalog.get(s.secondary)?;
            Some(ConjunctionEvent::new(EventFields {
                id: format!("conj-{}", i + 1),
                satellite1: primary.name.clone(),
                satellite2: secondary.name.clone(),
                norad_id1: primary.norad_id,
                norad_id2: secondary.norad_id,
                tca: now + Duration::hours(s.hours_from_now),
                min_range_km: s.min_range_km,
                probability: s.probability,
                relative_velocity_km_s: s.relative_velocity_km_s,
            }))
        })
        .collect();
    events.sort_by_key(|e| e.tca);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjunction::RiskLevel;

    #[test]
    fn scenarios_are_ordered_by_tca_and_classified() {
        let now = Utc::now();
        let events = synthetic_scenarios(&Catalog::builtin(), now);

        assert_eq!(events.len(), 5);
        assert!(events.windows(2).all(|w| w[0].tca <= w[1].tca));

        let closest = &events[0];
        assert_eq!(closest.id, "conj-5");
        assert_eq!(closest.satellite2, "M3MSAT");
        assert_eq!(closest.risk_level, RiskLevel::High);

        let levels: Vec<_> = events.iter().map(|e| e.risk_level).collect();
        assert_eq!(
            levels,
            vec![
                RiskLevel::High,
                RiskLevel::Medium,
                RiskLevel::Medium,
                RiskLevel::Low,
                RiskLevel::Low
            ]
        );
    }

    #[test]
    fn scenarios_are_deterministic() {
        let now = Utc::now();
        let catalog = Catalog::builtin();
        assert_eq!(synthetic_scenarios(&catalog, now), synthetic_scenarios(&catalog, now));
    }

    #[test]
    fn scenarios_need_both_participants_in_catalog() {
        let catalog = Catalog::from_entries(Vec::new());
        assert!(synthetic_scenarios(&catalog, Utc::now()).is_empty());
    }
}
