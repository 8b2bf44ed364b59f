//! Filter, sort, group and summarize conjunction events.
//!
//! All operations take `now` explicitly so results are reproducible, and
//! none of them mutate the caller's slice.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::types::{ConjunctionEvent, RiskLevel};

/// Conjunctive predicates; `None` fields are not applied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ConjunctionFilter {
    pub risk_level: Option<RiskLevel>,
    /// Matches either participant.
    pub norad_id: Option<u32>,
    pub min_probability: Option<f64>,
    pub max_range: Option<f64>,
    /// Keep events with TCA no later than this many hours from now.
    pub hours: Option<f64>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Case-insensitive match against names and identifiers.
    pub search: Option<String>,
}

impl ConjunctionFilter {
    pub fn matches(&self, event: &ConjunctionEvent, now: DateTime<Utc>) -> bool {
        if self.risk_level.is_some_and(|level| event.risk_level != level) {
            return false;
        }
        if self.norad_id.is_some_and(|id| !event.involves(id)) {
            return false;
        }
        if self.min_probability.is_some_and(|p| event.probability < p) {
            return false;
        }
        if self.max_range.is_some_and(|r| event.min_range_km > r) {
            return false;
        }
        if self.hours.is_some_and(|h| event.hours_until(now) > h) {
            return false;
        }
        if self.start.is_some_and(|start| event.tca < start) {
            return false;
        }
        if self.end.is_some_and(|end| event.tca > end) {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = event.satellite1.to_lowercase().contains(&needle)
                || event.satellite2.to_lowercase().contains(&needle)
                || event.norad_id1.to_string().contains(&needle)
                || event.norad_id2.to_string().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

pub fn filter(
    events: &[ConjunctionEvent],
    predicates: &ConjunctionFilter,
    now: DateTime<Utc>,
) -> Vec<ConjunctionEvent> {
    events
        .iter()
        .filter(|e| predicates.matches(e, now))
        .cloned()
        .collect()
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
    /// Probability descending, then minimum range ascending.
    #[default]
    Default,
    Probability,
    #[serde(alias = "minRange")]
    #[strum(serialize = "min_range", serialize = "minRange")]
    MinRange,
    Tca,
    #[serde(alias = "relativeVelocity")]
    #[strum(serialize = "relative_velocity", serialize = "relativeVelocity")]
    RelativeVelocity,
    #[serde(alias = "riskLevel")]
    #[strum(serialize = "risk_level", serialize = "riskLevel")]
    RiskLevel,
}

/// Stable sort into a new vector.
pub fn sort(events: &[ConjunctionEvent], key: SortKey) -> Vec<ConjunctionEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key));
    sorted
}

fn compare(a: &ConjunctionEvent, b: &ConjunctionEvent, key: SortKey) -> Ordering {
    match key {
        SortKey::Default => b
            .probability
            .total_cmp(&a.probability)
            .then_with(|| a.min_range_km.total_cmp(&b.min_range_km)),
        SortKey::Probability => b.probability.total_cmp(&a.probability),
        SortKey::MinRange => a.min_range_km.total_cmp(&b.min_range_km),
        SortKey::Tca => a.tca.cmp(&b.tca),
        SortKey::RelativeVelocity => b
            .relative_velocity_km_s
            .total_cmp(&a.relative_velocity_km_s),
        SortKey::RiskLevel => b.risk_level.rank().cmp(&a.risk_level.rank()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    RiskLevel,
    /// Each event is listed under both of its participants.
    Participant,
    TimeToTca,
}

pub const TIME_BUCKETS: [(&str, f64, f64); 4] = [
    ("0-6h", 0.0, 6.0),
    ("6-24h", 6.0, 24.0),
    ("24-48h", 24.0, 48.0),
    ("48h+", 48.0, f64::INFINITY),
];

pub type Groups = BTreeMap<String, Vec<ConjunctionEvent>>;

/// Group events along `by`. Risk and time groupings always contain every
/// bucket; events whose TCA is already past fall in no time bucket.
pub fn group(events: &[ConjunctionEvent], by: GroupBy, now: DateTime<Utc>) -> Groups {
    let mut groups = Groups::new();
    match by {
        GroupBy::RiskLevel => {
            for level in RiskLevel::ALL {
                groups.insert(level.to_string(), Vec::new());
            }
            for event in events {
                groups
                    .entry(event.risk_level.to_string())
                    .or_default()
                    .push(event.clone());
            }
        }
        GroupBy::Participant => {
            for event in events {
                groups
                    .entry(event.norad_id1.to_string())
                    .or_default()
                    .push(event.clone());
                if event.norad_id2 != event.norad_id1 {
                    groups
                        .entry(event.norad_id2.to_string())
                        .or_default()
                        .push(event.clone());
                }
            }
        }
        GroupBy::TimeToTca => {
            for (label, _, _) in TIME_BUCKETS {
                groups.insert(label.to_string(), Vec::new());
            }
            for event in events {
                let hours = event.hours_until(now);
                if let Some((label, _, _)) = TIME_BUCKETS
                    .iter()
                    .find(|(_, low, high)| hours >= *low && hours < *high)
                {
                    groups.entry(label.to_string()).or_default().push(event.clone());
                }
            }
        }
    }
    groups
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RiskCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ConjunctionStats {
    pub total: usize,
    pub by_risk_level: RiskCounts,
    pub max_probability: f64,
    pub min_range: f64,
    pub avg_relative_velocity: f64,
    /// High-risk events with TCA within the next 24 hours.
    pub urgent: usize,
}

pub fn stats(events: &[ConjunctionEvent], now: DateTime<Utc>) -> ConjunctionStats {
    let mut stats = ConjunctionStats {
        total: events.len(),
        ..Default::default()
    };
    let Some(first) = events.first() else {
        return stats;
    };

    stats.max_probability = first.probability;
    stats.min_range = first.min_range_km;
    let mut velocity_sum = 0.0;

    for event in events {
        match event.risk_level {
            RiskLevel::High => stats.by_risk_level.high += 1,
            RiskLevel::Medium => stats.by_risk_level.medium += 1,
            RiskLevel::Low => stats.by_risk_level.low += 1,
        }
        stats.max_probability = stats.max_probability.max(event.probability);
        stats.min_range = stats.min_range.min(event.min_range_km);
        velocity_sum += event.relative_velocity_km_s;
        if event.risk_level == RiskLevel::High && event.hours_until(now) <= 24.0 {
            stats.urgent += 1;
        }
    }

    stats.avg_relative_velocity = velocity_sum / events.len() as f64;
    stats
}

/// Filter, sort and truncate. Returns the page and the filtered total.
pub fn run_query(
    events: &[ConjunctionEvent],
    predicates: &ConjunctionFilter,
    key: SortKey,
    limit: Option<usize>,
    now: DateTime<Utc>,
) -> (Vec<ConjunctionEvent>, usize) {
    let mut selected = sort(&filter(events, predicates, now), key);
    let total = selected.len();
    if let Some(limit) = limit {
        selected.truncate(limit);
    }
    (selected, total)
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub filter: ConjunctionFilter,
    #[serde(default)]
    pub sort: SortKey,
    pub limit: Option<usize>,
    pub group_by: Option<GroupBy>,
    #[serde(default)]
    pub include_stats: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Analysis {
    pub events: Vec<ConjunctionEvent>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub groups: Option<Groups>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ConjunctionStats>,
}

/// Grouping and statistics cover every filtered event, not just the page.
pub fn analyze(events: &[ConjunctionEvent], request: &AnalysisRequest, now: DateTime<Utc>) -> Analysis {
    let filtered = sort(&filter(events, &request.filter, now), request.sort);
    let groups = request.group_by.map(|by| group(&filtered, by, now));
    let stats = request.include_stats.then(|| stats(&filtered, now));
    let total = filtered.len();

    let mut page = filtered;
    if let Some(limit) = request.limit {
        page.truncate(limit);
    }

    Analysis {
        events: page,
        total,
        groups,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjunction::types::EventFields;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
    }

    fn event(id: &str, ids: (u32, u32), hours: i64, range: f64, p: f64, v: f64) -> ConjunctionEvent {
        ConjunctionEvent::new(EventFields {
            id: id.to_string(),
            satellite1: format!("SAT-{}", ids.0),
            satellite2: format!("SAT-{}", ids.1),
            norad_id1: ids.0,
            norad_id2: ids.1,
            tca: now() + Duration::hours(hours),
            min_range_km: range,
            probability: p,
            relative_velocity_km_s: v,
        })
    }

    fn sample() -> Vec<ConjunctionEvent> {
        vec![
            event("a", (39089, 32382), 12, 2.5, 1e-5, 12.0),
            event("b", (46484, 46485), 24, 5.8, 1e-6, 10.0),
            event("c", (32382, 40895), 6, 1.2, 1e-4, 14.0),
            event("d", (46486, 27843), 48, 8.5, 1e-7, 11.0),
            event("e", (39089, 43616), 3, 0.8, 1e-3, 13.0),
            event("f", (27843, 40895), 30, 3.0, 1e-5, 9.0),
        ]
    }

    fn ids(events: &[ConjunctionEvent]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert_eq!(filter(&sample(), &ConjunctionFilter::default(), now()).len(), 6);
    }

    #[test]
    fn participant_filter_matches_either_side() {
        let f = ConjunctionFilter {
            norad_id: Some(32382),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&sample(), &f, now())), vec!["a", "c"]);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let f = ConjunctionFilter {
            min_probability: Some(1e-5),
            max_range: Some(2.5),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&sample(), &f, now())), vec!["a", "c", "e"]);
    }

    #[test]
    fn time_predicates_bound_tca() {
        let within_day = ConjunctionFilter {
            hours: Some(12.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&sample(), &within_day, now())), vec!["a", "c", "e"]);

        let window = ConjunctionFilter {
            start: Some(now() + Duration::hours(6)),
            end: Some(now() + Duration::hours(24)),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&sample(), &window, now())), vec!["a", "b", "c"]);
    }

    #[test]
    fn search_matches_names_and_ids() {
        let by_name = ConjunctionFilter {
            search: Some("SAT-4361".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&sample(), &by_name, now())), vec!["e"]);

        let by_id = ConjunctionFilter {
            search: Some("4648".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&sample(), &by_id, now())), vec!["b", "d"]);
    }

    #[test]
    fn independent_predicates_commute() {
        let high = ConjunctionFilter {
            risk_level: Some(RiskLevel::High),
            ..Default::default()
        };
        let likely = ConjunctionFilter {
            min_probability: Some(1e-5),
            ..Default::default()
        };
        let events = sample();
        let one = filter(&filter(&events, &high, now()), &likely, now());
        let two = filter(&filter(&events, &likely, now()), &high, now());
        assert_eq!(one, two);
    }

    #[test]
    fn default_sort_breaks_probability_ties_by_range() {
        let sorted = sort(&sample(), SortKey::Default);
        assert_eq!(ids(&sorted), vec!["e", "c", "a", "f", "b", "d"]);
    }

    #[test]
    fn each_key_orders_in_its_direction() {
        let events = sample();
        assert_eq!(ids(&sort(&events, SortKey::MinRange))[0], "e");
        assert_eq!(ids(&sort(&events, SortKey::Tca)), vec!["e", "c", "a", "b", "f", "d"]);
        assert_eq!(ids(&sort(&events, SortKey::RelativeVelocity))[0], "c");
        let by_risk = sort(&events, SortKey::RiskLevel);
        assert!(by_risk
            .windows(2)
            .all(|w| w[0].risk_level.rank() >= w[1].risk_level.rank()));
    }

    #[test]
    fn sorting_is_idempotent_and_leaves_input_alone() {
        let events = sample();
        let once = sort(&events, SortKey::Probability);
        assert_eq!(sort(&once, SortKey::Probability), once);
        assert_eq!(ids(&events), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn sort_keys_parse_from_both_spellings() {
        assert_eq!("min_range".parse::<SortKey>().unwrap(), SortKey::MinRange);
        assert_eq!("relativeVelocity".parse::<SortKey>().unwrap(), SortKey::RelativeVelocity);
        assert!("sideways".parse::<SortKey>().is_err());
    }

    #[test]
    fn participant_grouping_lists_event_under_both_ids() {
        let groups = group(&sample(), GroupBy::Participant, now());
        assert!(ids(&groups["39089"]).contains(&"a"));
        assert!(ids(&groups["32382"]).contains(&"a"));
        assert_eq!(ids(&groups["40895"]), vec!["c", "f"]);
    }

    #[test]
    fn risk_grouping_has_fixed_buckets() {
        let groups = group(&[], GroupBy::RiskLevel, now());
        assert_eq!(groups.len(), 3);
        assert!(groups.values().all(Vec::is_empty));

        let groups = group(&sample(), GroupBy::RiskLevel, now());
        assert_eq!(ids(&groups["high"]), vec!["e"]);
    }

    #[test]
    fn time_buckets_are_half_open() {
        let events = vec![
            event("now", (1, 2), 0, 9.0, 0.0, 1.0),
            event("six", (1, 2), 6, 9.0, 0.0, 1.0),
            event("day", (1, 2), 24, 9.0, 0.0, 1.0),
            event("two-days", (1, 2), 48, 9.0, 0.0, 1.0),
            event("past", (1, 2), -1, 9.0, 0.0, 1.0),
        ];
        let groups = group(&events, GroupBy::TimeToTca, now());
        assert_eq!(ids(&groups["0-6h"]), vec!["now"]);
        assert_eq!(ids(&groups["6-24h"]), vec!["six"]);
        assert_eq!(ids(&groups["24-48h"]), vec!["day"]);
        assert_eq!(ids(&groups["48h+"]), vec!["two-days"]);
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        assert_eq!(stats(&[], now()), ConjunctionStats::default());
    }

    #[test]
    fn stats_summarize_events() {
        let s = stats(&sample(), now());
        assert_eq!(s.total, 6);
        assert_eq!(
            s.by_risk_level,
            RiskCounts {
                high: 1,
                medium: 3,
                low: 2
            }
        );
        assert_eq!(s.max_probability, 1e-3);
        assert_eq!(s.min_range, 0.8);
        assert!((s.avg_relative_velocity - 11.5).abs() < 1e-12);
        assert_eq!(s.urgent, 1);
    }

    #[test]
    fn analysis_counts_before_limit() {
        let request = AnalysisRequest {
            limit: Some(2),
            group_by: Some(GroupBy::RiskLevel),
            include_stats: true,
            ..Default::default()
        };
        let analysis = analyze(&sample(), &request, now());
        assert_eq!(ids(&analysis.events), vec!["e", "c"]);
        assert_eq!(analysis.total, 6);
        assert_eq!(analysis.stats.map(|s| s.total), Some(6));
        assert_eq!(analysis.groups.map(|g| g["low"].len()), Some(2));
    }

    #[test]
    fn run_query_limits_after_sorting() {
        let (page, total) = run_query(&sample(), &ConjunctionFilter::default(), SortKey::Tca, Some(1), now());
        assert_eq!(ids(&page), vec!["e"]);
        assert_eq!(total, 6);
    }
}
