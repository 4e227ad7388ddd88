//! CSV fix-table loader.
//!
//! # CSV format
//!
//! One row per fix.  `valid` is optional and defaults to `true`; an
//! empty `indicator` makes the fix reachable by number only.
//!
//! ```csv
//! id,indicator,lat,lng,valid
//! 1,ABC,-23.0,-46.0,true
//! 2,SBGR,-23.435,-46.473,
//! 3,,-22.9,-47.1,false
//! ```
//!
//! Duplicate numbers and duplicate (normalized) indicators abort the load.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use trk_core::FixId;

use crate::{CoordsError, CoordsResult, Fix, FixRegistry, FixRegistryBuilder};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FixRecord {
    id:        u32,
    #[serde(default)]
    indicator: String,
    lat:       f64,
    lng:       f64,
    #[serde(default)]
    valid:     Option<bool>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`FixRegistry`] from a CSV file.
pub fn load_fixes_csv(path: &Path) -> CoordsResult<FixRegistry> {
    let file = std::fs::File::open(path).map_err(CoordsError::Io)?;
    let registry = load_fixes_reader(file)?;
    info!(path = %path.display(), fixes = registry.len(), "fix table loaded");
    Ok(registry)
}

/// Like [`load_fixes_csv`] but accepts any `Read` source.
pub fn load_fixes_reader<R: Read>(reader: R) -> CoordsResult<FixRegistry> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut builder = FixRegistryBuilder::new();

    for result in csv_reader.deserialize::<FixRecord>() {
        let row = result.map_err(|e| CoordsError::Parse(e.to_string()))?;
        if !(-90.0..=90.0).contains(&row.lat) || !(-180.0..=180.0).contains(&row.lng) {
            return Err(CoordsError::Parse(format!(
                "fix {} has out-of-range position ({}, {})",
                row.id, row.lat, row.lng
            )));
        }
        let fix = Fix::new(FixId(row.id), row.indicator, row.lat, row.lng)
            .with_valid(row.valid.unwrap_or(true));
        builder.insert(fix)?;
    }

    Ok(builder.build())
}
