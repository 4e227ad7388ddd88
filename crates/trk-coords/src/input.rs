//! Coordinate inputs: the raw record form and the typed variant.
//!
//! A [`CoordinateRecord`] is what scenario files and the wire carry: a kind
//! character plus up to four text fields.  [`CoordinateInput::from_record`]
//! turns it into a typed [`CoordinateInput`], parsing the numeric fields the
//! kind needs.
//!
//! | Kind | Variant          | Fields                                          |
//! |------|------------------|-------------------------------------------------|
//! | `D`  | `DistanceRadial` | A fix number, B distance (NM), C azimuth (deg)  |
//! | `F`  | `FixNumber`      | A fix number                                    |
//! | `G`  | `Sexagesimal`    | A latitude, B longitude, both `DDDMM.mmmH`      |
//! | `I`  | `Indicator`      | A fix indicator                                 |
//! | `L`  | `Decimal`        | A latitude, B longitude, signed degrees         |
//! | `P`  | `Polar`          | not supported                                   |
//! | `X`  | `Unknown`        | not supported                                   |

use std::fmt;

use serde::Deserialize;

use trk_core::FixId;

use crate::ResolveStatus;

// ── CoordKind ─────────────────────────────────────────────────────────────────

/// The seven coordinate encodings, keyed by their single-letter code.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CoordKind {
    DistanceRadial,
    FixNumber,
    Sexagesimal,
    Indicator,
    Decimal,
    Polar,
    Unknown,
}

impl CoordKind {
    pub const ALL: [CoordKind; 7] = [
        CoordKind::DistanceRadial,
        CoordKind::FixNumber,
        CoordKind::Sexagesimal,
        CoordKind::Indicator,
        CoordKind::Decimal,
        CoordKind::Polar,
        CoordKind::Unknown,
    ];

    /// Map a kind character to its kind.  Codes are case-sensitive.
    pub fn from_code(code: char) -> Option<CoordKind> {
        match code {
            'D' => Some(CoordKind::DistanceRadial),
            'F' => Some(CoordKind::FixNumber),
            'G' => Some(CoordKind::Sexagesimal),
            'I' => Some(CoordKind::Indicator),
            'L' => Some(CoordKind::Decimal),
            'P' => Some(CoordKind::Polar),
            'X' => Some(CoordKind::Unknown),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            CoordKind::DistanceRadial => 'D',
            CoordKind::FixNumber      => 'F',
            CoordKind::Sexagesimal    => 'G',
            CoordKind::Indicator      => 'I',
            CoordKind::Decimal        => 'L',
            CoordKind::Polar          => 'P',
            CoordKind::Unknown        => 'X',
        }
    }
}

impl fmt::Display for CoordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ── CoordinateRecord ──────────────────────────────────────────────────────────

/// Untyped coordinate as read from a scenario table or message payload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CoordinateRecord {
    pub kind:    char,
    pub field_a: String,
    #[serde(default)]
    pub field_b: Option<String>,
    #[serde(default)]
    pub field_c: Option<String>,
    #[serde(default)]
    pub field_d: Option<String>,
}

impl CoordinateRecord {
    pub fn new(kind: char, field_a: impl Into<String>) -> Self {
        Self {
            kind,
            field_a: field_a.into(),
            field_b: None,
            field_c: None,
            field_d: None,
        }
    }

    pub fn with_b(mut self, b: impl Into<String>) -> Self {
        self.field_b = Some(b.into());
        self
    }

    pub fn with_c(mut self, c: impl Into<String>) -> Self {
        self.field_c = Some(c.into());
        self
    }

    pub fn with_d(mut self, d: impl Into<String>) -> Self {
        self.field_d = Some(d.into());
        self
    }
}

// ── CoordinateInput ───────────────────────────────────────────────────────────

/// A coordinate in one of the seven supported encodings.
#[derive(Clone, Debug, PartialEq)]
pub enum CoordinateInput {
    /// Offset of `distance_nm` along true azimuth `radial_deg` from a fix.
    DistanceRadial { fix: FixId, distance_nm: f64, radial_deg: f64 },
    FixNumber { fix: FixId },
    /// Latitude and longitude as `DDDMM.mmmH` text, parsed at resolution.
    Sexagesimal { lat: String, lng: String },
    Indicator { indicator: String },
    Decimal { lat: f64, lng: f64 },
    Polar { field_a: String, field_b: Option<String> },
    Unknown,
}

impl CoordinateInput {
    pub fn kind(&self) -> CoordKind {
        match self {
            CoordinateInput::DistanceRadial { .. } => CoordKind::DistanceRadial,
            CoordinateInput::FixNumber { .. }      => CoordKind::FixNumber,
            CoordinateInput::Sexagesimal { .. }    => CoordKind::Sexagesimal,
            CoordinateInput::Indicator { .. }      => CoordKind::Indicator,
            CoordinateInput::Decimal { .. }        => CoordKind::Decimal,
            CoordinateInput::Polar { .. }          => CoordKind::Polar,
            CoordinateInput::Unknown               => CoordKind::Unknown,
        }
    }

    /// Type the fields of `record` for its kind.
    ///
    /// Errors with `InvalidKind` for an unrecognized kind character and
    /// `Malformed` for a missing or unparsable field.
    pub fn from_record(record: &CoordinateRecord) -> Result<CoordinateInput, ResolveStatus> {
        let kind = CoordKind::from_code(record.kind).ok_or(ResolveStatus::InvalidKind)?;
        let a = record.field_a.as_str();
        let b = record.field_b.as_deref();
        let c = record.field_c.as_deref();

        Ok(match kind {
            CoordKind::DistanceRadial => CoordinateInput::DistanceRadial {
                fix:         parse_fix(a)?,
                distance_nm: parse_f64(required(b)?)?,
                radial_deg:  parse_f64(required(c)?)?,
            },
            CoordKind::FixNumber => CoordinateInput::FixNumber { fix: parse_fix(a)? },
            CoordKind::Sexagesimal => CoordinateInput::Sexagesimal {
                lat: a.to_owned(),
                lng: required(b)?.to_owned(),
            },
            CoordKind::Indicator => CoordinateInput::Indicator { indicator: a.to_owned() },
            CoordKind::Decimal => CoordinateInput::Decimal {
                lat: parse_f64(a)?,
                lng: parse_f64(required(b)?)?,
            },
            CoordKind::Polar => CoordinateInput::Polar {
                field_a: a.to_owned(),
                field_b: b.map(str::to_owned),
            },
            CoordKind::Unknown => CoordinateInput::Unknown,
        })
    }
}

// ── Field parsing ─────────────────────────────────────────────────────────────

fn required(field: Option<&str>) -> Result<&str, ResolveStatus> {
    field.ok_or(ResolveStatus::Malformed)
}

fn parse_fix(text: &str) -> Result<FixId, ResolveStatus> {
    text.trim().parse::<u32>().map(FixId).map_err(|_| ResolveStatus::Malformed)
}

fn parse_f64(text: &str) -> Result<f64, ResolveStatus> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ResolveStatus::Malformed)
}
