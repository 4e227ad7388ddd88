//! `PerformanceTable`: all performance records of a scenario.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{PerfResult, PerformanceDocument, PerformanceRecord};

/// Key under which each record carries its designator.
const DESIGNATOR_KEY: &str = "nPrf";

/// What happened to the records of a document during a load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded:   usize,
    /// Indices of records skipped for lacking a designator.
    pub skipped:  Vec<usize>,
    /// Designators that appeared more than once; the last record wins.
    pub replaced: Vec<String>,
}

/// Records keyed by designator, iterated in designator order.
#[derive(Clone, Debug, Default)]
pub struct PerformanceTable {
    records: BTreeMap<String, PerformanceRecord>,
    version: Option<String>,
}

impl PerformanceTable {
    /// Build a table from a parsed document.
    ///
    /// Fails on a bad signature or an unparsable field.  Records without a
    /// designator are skipped with a warning.
    pub fn from_document(doc: &PerformanceDocument) -> PerfResult<(Self, LoadReport)> {
        doc.check_signature()?;

        let mut table = Self { records: BTreeMap::new(), version: doc.version.clone() };
        let mut report = LoadReport::default();

        for (index, fields) in doc.records.iter().enumerate() {
            let designator = match fields.get(DESIGNATOR_KEY).map(|d| d.trim()) {
                Some(d) if !d.is_empty() => d,
                _ => {
                    warn!(index, "performance record has no designator, skipped");
                    report.skipped.push(index);
                    continue;
                }
            };

            let record = PerformanceRecord::from_fields(designator, fields)?;
            for issue in record.validate() {
                warn!(designator, %issue, "inconsistent performance record");
            }
            if table.records.insert(designator.to_owned(), record).is_some() {
                warn!(designator, "duplicate performance designator, replaced");
                report.replaced.push(designator.to_owned());
            } else {
                report.loaded += 1;
            }
        }

        info!(
            records = table.len(),
            skipped = report.skipped.len(),
            version = ?table.version,
            "performance table loaded"
        );
        Ok((table, report))
    }

    pub fn get(&self, designator: &str) -> Option<&PerformanceRecord> {
        self.records.get(designator)
    }

    pub fn contains(&self, designator: &str) -> bool {
        self.records.contains_key(designator)
    }

    pub fn designators(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerformanceRecord> + '_ {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
