use chrono::{DateTime, NaiveDateTime, Utc};

use super::types::{ConjunctionEvent, EventFields};

const UNKNOWN_NAME: &str = "Unknown";

/// Events parsed from one feed plus the number of data rows dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub events: Vec<ConjunctionEvent>,
    pub skipped: usize,
}

/// Parse a comma-delimited conjunction feed fetched for `tracked_id`.
///
/// Columns: name1, name2, id1, id2, tca, min range, probability, relative
/// velocity. Quoted fields may contain commas. Rows shorter than the header
/// are dropped whole; unparsable numbers read as zero and an unparsable time
/// reads as `now`.
pub fn parse_feed(raw: &str, tracked_id: u32, now: DateTime<Utc>) -> ParsedFeed {
    let mut feed = ParsedFeed::default();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let columns = match reader.headers() {
        Ok(header) => header.len(),
        Err(err) => {
            log::warn!("Unreadable feed header for NORAD {}: {}", tracked_id, err);
            return feed;
        }
    };

    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                log::debug!("Unreadable row in feed for NORAD {}: {}", tracked_id, err);
                feed.skipped += 1;
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        if record.len() < columns {
            feed.skipped += 1;
            continue;
        }

        let text = |i: usize| record.get(i).unwrap_or_default();
        feed.events.push(ConjunctionEvent::new(EventFields {
            id: format!("socrates-{}-{}", tracked_id, index + 1),
            satellite1: name_or_unknown(text(0)),
            satellite2: name_or_unknown(text(1)),
            norad_id1: text(2).parse().unwrap_or(0),
            norad_id2: text(3).parse().unwrap_or(0),
            tca: parse_time(text(4)).unwrap_or(now),
            min_range_km: parse_number(text(5)),
            probability: parse_number(text(6)),
            relative_velocity_km_s: parse_number(text(7)),
        }));
    }

    if feed.skipped > 0 {
        log::debug!(
            "Skipped {} malformed rows in feed for NORAD {}",
            feed.skipped,
            tracked_id
        );
    }
    feed
}

/// Whitespace-only lines read as a single empty field.
fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn name_or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        value.to_string()
    }
}

fn parse_number(value: &str) -> f64 {
    value.parse::<f64>().ok().filter(|v| !v.is_nan()).unwrap_or(0.0)
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
