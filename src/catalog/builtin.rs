use std::collections::BTreeMap;

use super::types::{CatalogEntry, ElementSet, Status};

struct Template {
    norad_id: u32,
    name: &'static str,
    line1: &'static str,
    line2: &'static str,
    launch_date: &'static str,
    status: Status,
    operator: &'static str,
    purpose: &'static str,
}

// Template element sets. The epoch and checksums are rewritten by the
// synthetic generator before any of these is propagated.
const TEMPLATES: &[Template] = &[
    Template {
        norad_id: 39089,
        name: "SAPPHIRE",
        line1: "1 39089U 13009A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 39089  98.0000 180.0000 0001000  90.0000 270.0000 14.00000000000000",
        launch_date: "2013-02-25",
        status: Status::Active,
        operator: "Canadian Armed Forces",
        purpose: "Space Surveillance",
    },
    Template {
        norad_id: 32382,
        name: "RADARSAT-2",
        line1: "1 32382U 07061A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 32382  98.6000 180.0000 0001200  90.0000 270.0000 14.30000000000000",
        launch_date: "2007-12-14",
        status: Status::Active,
        operator: "MDA",
        purpose: "Earth Observation",
    },
    Template {
        norad_id: 46484,
        name: "RADARSAT CONSTELLATION 1",
        line1: "1 46484U 19034A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 46484  97.7400 180.0000 0001100  90.0000 270.0000 14.98000000000000",
        launch_date: "2019-06-12",
        status: Status::Active,
        operator: "Canadian Space Agency",
        purpose: "Earth Observation",
    },
    Template {
        norad_id: 46485,
        name: "RADARSAT CONSTELLATION 2",
        line1: "1 46485U 19034B   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 46485  97.7400 180.0000 0001100  90.0000 270.0000 14.98000000000000",
        launch_date: "2019-06-12",
        status: Status::Active,
        operator: "Canadian Space Agency",
        purpose: "Earth Observation",
    },
    Template {
        norad_id: 46486,
        name: "RADARSAT CONSTELLATION 3",
        line1: "1 46486U 19034C   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 46486  97.7400 180.0000 0001100  90.0000 270.0000 14.98000000000000",
        launch_date: "2019-06-12",
        status: Status::Active,
        operator: "Canadian Space Agency",
        purpose: "Earth Observation",
    },
    Template {
        norad_id: 27843,
        name: "SCISAT-1",
        line1: "1 27843U 03036A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 27843  73.9000 180.0000 0004000  90.0000 270.0000 14.77000000000000",
        launch_date: "2003-08-12",
        status: Status::Active,
        operator: "Canadian Space Agency",
        purpose: "Atmospheric Research",
    },
    Template {
        norad_id: 40895,
        name: "CASSIOPE",
        line1: "1 40895U 15052A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 40895  80.9500 180.0000 0015000  90.0000 270.0000 14.85000000000000",
        launch_date: "2013-09-29",
        status: Status::Active,
        operator: "Canadian Space Agency",
        purpose: "Communications & Science",
    },
    Template {
        norad_id: 25063,
        name: "RADARSAT-1",
        line1: "1 25063U 97077A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 25063  98.6000 180.0000 0001200  90.0000 270.0000 14.30000000000000",
        launch_date: "1995-11-04",
        status: Status::Inactive,
        operator: "Canadian Space Agency",
        purpose: "Earth Observation",
    },
    Template {
        norad_id: 43616,
        name: "M3MSAT",
        line1: "1 43616U 18046A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 43616  97.5000 180.0000 0001500  90.0000 270.0000 15.10000000000000",
        launch_date: "2016-06-22",
        status: Status::Active,
        operator: "Canadian Armed Forces",
        purpose: "Maritime Surveillance",
    },
    Template {
        norad_id: 44878,
        name: "TELESAT TELSTAR 19V",
        line1: "1 44878U 19071A   24100.50000000  .00000000  00000-0  00000-0 0  9999",
        line2: "2 44878   0.0200 180.0000 0001000  90.0000 270.0000  1.00270000000000",
        launch_date: "2018-07-22",
        status: Status::Active,
        operator: "Telesat",
        purpose: "Communications",
    },
];

/// Fixed set of tracked objects, in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: BTreeMap<u32, usize>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self::from_entries(
            TEMPLATES
                .iter()
                .map(|t| CatalogEntry {
                    norad_id: t.norad_id,
                    name: t.name.to_string(),
                    elements: ElementSet::new(t.line1, t.line2),
                    status: t.status,
                    launch_date: Some(t.launch_date.to_string()),
                    operator: Some(t.operator.to_string()),
                    purpose: Some(t.purpose.to_string()),
                })
                .collect(),
        )
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.norad_id, i))
            .collect();
        Self { entries, index }
    }

    pub fn get(&self, norad_id: u32) -> Option<&CatalogEntry> {
        self.index.get(&norad_id).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.norad_id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
