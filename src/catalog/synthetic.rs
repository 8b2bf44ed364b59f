//! Synthetic element sets for objects the upstream source could not provide.
//!
//! The generator keeps the template's orbital elements and moves its epoch to
//! the requested instant, so propagation near "now" stays well conditioned.

use chrono::{DateTime, Datelike, Timelike, Utc};

use super::types::{CatalogEntry, ElementSet};

const EPOCH_COLUMNS: std::ops::Range<usize> = 18..32;
const CHECKSUM_COLUMN: usize = 68;

/// Derive an element set for `entry` with its epoch set to `now`.
pub fn synthesize(entry: &CatalogEntry, now: DateTime<Utc>) -> ElementSet {
    let line1 = match rewrite_epoch(&entry.elements.line1, now) {
        Some(line) => line,
        None => {
            log::warn!(
                "Template for NORAD {} is not a fixed-format line, using it unchanged",
                entry.norad_id
            );
            return entry.elements.clone();
        }
    };
    ElementSet {
        line2: with_checksum(&entry.elements.line2).unwrap_or_else(|| entry.elements.line2.clone()),
        line1,
    }
}

/// Mod-10 checksum over the first 68 columns: digits count at face value,
/// minus signs count as one, everything else is ignored.
pub fn tle_checksum(line: &str) -> u32 {
    line.bytes()
        .take(CHECKSUM_COLUMN)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum::<u32>()
        % 10
}

fn format_epoch(now: DateTime<Utc>) -> String {
    let day = now.ordinal() as f64 + now.num_seconds_from_midnight() as f64 / 86_400.0;
    format!("{:02}{:012.8}", now.year().rem_euclid(100), day)
}

fn rewrite_epoch(line1: &str, now: DateTime<Utc>) -> Option<String> {
    if !line1.is_ascii() || line1.len() < CHECKSUM_COLUMN {
        return None;
    }
    let mut line = String::with_capacity(CHECKSUM_COLUMN + 1);
    line.push_str(&line1[..EPOCH_COLUMNS.start]);
    line.push_str(&format_epoch(now));
    line.push_str(&line1[EPOCH_COLUMNS.end..CHECKSUM_COLUMN]);
    with_checksum(&line)
}

fn with_checksum(line: &str) -> Option<String> {
    if !line.is_ascii() || line.len() < CHECKSUM_COLUMN {
        return None;
    }
    let body = &line[..CHECKSUM_COLUMN];
    Some(format!("{}{}", body, tle_checksum(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::TimeZone;

    #[test]
    fn checksum_matches_published_element_set() {
        let line1 = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
        let line2 = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
        assert_eq!(tle_checksum(line1), 7);
        assert_eq!(tle_checksum(line2), 7);
    }

    #[test]
    fn epoch_is_two_digit_year_and_fractional_day() {
        let noon = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        assert_eq!(format_epoch(noon), "26032.50000000");
    }

    #[test]
    fn synthesized_sets_parse_for_whole_catalog() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 6, 30, 0).unwrap();
        for entry in Catalog::builtin().entries() {
            let set = synthesize(entry, now);
            assert_eq!(set.line1.len(), 69);
            assert_eq!(set.line2.len(), 69);

            let elements = set
                .to_elements(Some(entry.name.clone()))
                .unwrap_or_else(|e| panic!("{}: {}", entry.name, e));
            assert_eq!(elements.norad_id, entry.norad_id as u64);
            let drift = (elements.datetime - now.naive_utc()).num_seconds().abs();
            assert!(drift <= 1, "{} epoch drifted {}s", entry.name, drift);
        }
    }

    #[test]
    fn synthesis_is_deterministic_for_an_instant() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let catalog = Catalog::builtin();
        let entry = &catalog.entries()[0];
        assert_eq!(synthesize(entry, now), synthesize(entry, now));
    }
}
