use super::types::ConjunctionEvent;

const CSV_HEADER: [&str; 9] = [
    "Satellite 1",
    "Satellite 2",
    "NORAD ID 1",
    "NORAD ID 2",
    "TCA",
    "Min Range (km)",
    "Probability",
    "Relative Velocity (km/s)",
    "Risk Level",
];

/// One header row plus one row per event, in the given order.
pub fn to_csv(events: &[ConjunctionEvent]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;
    for e in events {
        writer.write_record([
            e.satellite1.clone(),
            e.satellite2.clone(),
            e.norad_id1.to_string(),
            e.norad_id2.to_string(),
            e.tca.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.3}", e.min_range_km),
            format!("{:.6e}", e.probability),
            format!("{:.3}", e.relative_velocity_km_s),
            e.risk_level.to_string(),
        ])?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|err| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

/// Human-readable odds, e.g. `1 in 10,000`.
pub fn format_probability(probability: f64) -> String {
    if probability <= 0.0 || probability.is_nan() {
        return "0".to_string();
    }
    if probability >= 1.0 {
        return "1 in 1".to_string();
    }
    let inverse = (1.0 / probability).round() as u64;
    format!("1 in {}", group_thousands(inverse))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjunction::parser::parse_feed;
    use crate::conjunction::types::EventFields;
    use crate::conjunction::RiskLevel;
    use chrono::{TimeZone, Utc};

    #[test]
    fn csv_has_header_and_formatted_rows() {
        let event = ConjunctionEvent::new(EventFields {
            id: "conj-5".into(),
            satellite1: "SAPPHIRE".into(),
            satellite2: "M3MSAT".into(),
            norad_id1: 39089,
            norad_id2: 43616,
            tca: Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap(),
            min_range_km: 0.8,
            probability: 0.001,
            relative_velocity_km_s: 13.6,
        });
        let csv = to_csv(&[event]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[1],
            "SAPPHIRE,M3MSAT,39089,43616,2026-10-19 03:00:00,0.800,1.000000e-3,13.600,high"
        );
    }

    #[test]
    fn names_with_commas_survive_export_and_reparse() {
        let tca = Utc.with_ymd_and_hms(2026, 10, 19, 5, 0, 0).unwrap();
        let event = ConjunctionEvent::new(EventFields {
            id: "conj-1".into(),
            satellite1: "COSMOS 2251 DEB, PIECE".into(),
            satellite2: "SAPPHIRE".into(),
            norad_id1: 34454,
            norad_id2: 39089,
            tca,
            min_range_km: 12.0,
            probability: 1e-7,
            relative_velocity_km_s: 14.5,
        });
        let csv = to_csv(&[event]).unwrap();
        assert!(csv.contains("\"COSMOS 2251 DEB, PIECE\",SAPPHIRE,34454,39089"));

        let feed = parse_feed(&csv, 39089, tca);
        assert_eq!(feed.skipped, 0);
        assert_eq!(feed.events[0].satellite1, "COSMOS 2251 DEB, PIECE");
        assert_eq!(feed.events[0].min_range_km, 12.0);
        assert_eq!(feed.events[0].risk_level, RiskLevel::Low);
    }

    #[test]
    fn probability_reads_as_odds() {
        assert_eq!(format_probability(0.0), "0");
        assert_eq!(format_probability(-1.0), "0");
        assert_eq!(format_probability(2.0), "1 in 1");
        assert_eq!(format_probability(0.0001), "1 in 10,000");
        assert_eq!(format_probability(0.5), "1 in 2");
        assert_eq!(format_probability(1e-7), "1 in 10,000,000");
    }
}
