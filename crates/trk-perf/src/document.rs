//! Parsed performance document.
//!
//! The document mirrors the performance file layout without tying the crate
//! to any markup parser: a root element name, the three signature
//! attributes, and one flat string map per `performance` element (the
//! designator attribute appears under the `nPrf` key).
//!
//! A JSON rendition can be loaded directly:
//!
//! ```json
//! {
//!   "root": "performances", "format": "NEWTON", "code": "1961", "version": "0001",
//!   "records": [ { "nPrf": "A1", "descricao": "AMX", "esteira": "M", "tetosv": "420" } ]
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{PerfError, PerfResult};

/// Root signature values every performance document must carry.
pub const ROOT_TAG: &str = "performances";
pub const FORMAT:   &str = "NEWTON";
pub const CODE:     &str = "1961";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PerformanceDocument {
    pub root:    String,
    pub format:  String,
    pub code:    String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub records: Vec<BTreeMap<String, String>>,
}

impl PerformanceDocument {
    /// An empty document with a valid signature.
    pub fn signed() -> Self {
        Self {
            root:    ROOT_TAG.to_owned(),
            format:  FORMAT.to_owned(),
            code:    CODE.to_owned(),
            version: None,
            records: Vec::new(),
        }
    }

    /// Append one record built from `(key, value)` pairs.
    pub fn with_record<'a, I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.records
            .push(fields.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect());
        self
    }

    /// Check root tag, format, and code, in that order.
    pub fn check_signature(&self) -> PerfResult<()> {
        if self.root != ROOT_TAG {
            return Err(PerfError::NotAPerformanceFile(self.root.clone()));
        }
        if self.format != FORMAT {
            return Err(PerfError::UnsupportedFormat(self.format.clone()));
        }
        if self.code != CODE {
            return Err(PerfError::BadSignature(self.code.clone()));
        }
        Ok(())
    }
}

/// Read a JSON performance document from a file.
pub fn load_performance_json(path: &Path) -> PerfResult<PerformanceDocument> {
    let file = std::fs::File::open(path).map_err(PerfError::Io)?;
    load_performance_reader(std::io::BufReader::new(file))
}

/// Like [`load_performance_json`] but accepts any `Read` source.
pub fn load_performance_reader<R: Read>(reader: R) -> PerfResult<PerformanceDocument> {
    Ok(serde_json::from_reader(reader)?)
}
