//! Typed performance record for one aircraft type.
//!
//! Speeds are knots, rates are feet per minute (speed-change rates are knots
//! per minute) and the ceiling is a flight level.  Fields absent from the
//! source map are zero; [`PerformanceRecord::validate`] reports the
//! resulting gaps instead of rejecting the record.

use std::collections::BTreeMap;
use std::fmt;

use crate::{PerfError, PerfResult};

/// ICAO wake turbulence category (`esteira`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum WakeCategory {
    Light,
    #[default]
    Medium,
    Heavy,
    Super,
}

impl WakeCategory {
    pub fn from_code(code: &str) -> Option<WakeCategory> {
        match code.trim().to_ascii_uppercase().as_str() {
            "L" => Some(WakeCategory::Light),
            "M" => Some(WakeCategory::Medium),
            "H" => Some(WakeCategory::Heavy),
            "J" => Some(WakeCategory::Super),
            _ => None,
        }
    }
}

/// A consistency problem found by [`PerformanceRecord::validate`].
#[derive(Clone, PartialEq, Debug)]
pub enum PerfIssue {
    /// Service ceiling is zero or negative.
    NonPositiveCeiling(f64),
    /// A normal value exceeds its declared maximum.
    AboveMaximum {
        field:   &'static str,
        value:   f64,
        maximum: f64,
    },
}

impl fmt::Display for PerfIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerfIssue::NonPositiveCeiling(c) => write!(f, "non-positive ceiling {c}"),
            PerfIssue::AboveMaximum { field, value, maximum } => {
                write!(f, "{field} {value} exceeds maximum {maximum}")
            }
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct PerformanceRecord {
    pub designator:                String,
    pub description:               String,
    pub wake:                      WakeCategory,
    pub ceiling_fl:                f64,
    pub band:                      f64,

    pub takeoff_speed:             f64,
    pub initial_climb_speed:       f64,
    pub approach_speed:            f64,
    pub cruise_speed:              f64,
    pub max_cruise_speed:          f64,

    pub takeoff_climb_rate:        f64,
    pub max_takeoff_climb_rate:    f64,
    pub cruise_climb_rate:         f64,
    pub max_cruise_climb_rate:     f64,
    pub approach_descent_rate:     f64,
    pub max_approach_descent_rate: f64,
    pub cruise_descent_rate:       f64,
    pub max_cruise_descent_rate:   f64,
    pub speed_change_rate:         f64,
    pub max_speed_change_rate:     f64,
}

impl PerformanceRecord {
    /// Type a record from its source map.
    ///
    /// `designator` is the `nPrf` value; unknown keys are ignored.
    pub fn from_fields(designator: &str, fields: &BTreeMap<String, String>) -> PerfResult<Self> {
        let number = |field: &'static str| -> PerfResult<f64> {
            match fields.get(field).map(|v| v.trim()) {
                None | Some("") => Ok(0.0),
                Some(v) => v.parse::<f64>().ok().filter(|x| x.is_finite()).ok_or_else(|| {
                    PerfError::InvalidField {
                        designator: designator.to_owned(),
                        field,
                        value: v.to_owned(),
                    }
                }),
            }
        };

        let wake = match fields.get("esteira").map(|v| v.trim()) {
            None | Some("") => WakeCategory::default(),
            Some(v) => WakeCategory::from_code(v).ok_or_else(|| PerfError::InvalidField {
                designator: designator.to_owned(),
                field:      "esteira",
                value:      v.to_owned(),
            })?,
        };

        Ok(Self {
            designator:                designator.to_owned(),
            description:               fields
                .get("descricao")
                .map(|s| s.trim().to_owned())
                .unwrap_or_default(),
            wake,
            ceiling_fl:                number("tetosv")?,
            band:                      number("faixa")?,
            takeoff_speed:             number("veldec")?,
            initial_climb_speed:       number("velsbdec")?,
            approach_speed:            number("velapx")?,
            cruise_speed:              number("velcruz")?,
            max_cruise_speed:          number("velmxcrz")?,
            takeoff_climb_rate:        number("rzsubdec")?,
            max_takeoff_climb_rate:    number("rzmxsbdec")?,
            cruise_climb_rate:         number("rzsbcrz")?,
            max_cruise_climb_rate:     number("rzmxsbcrz")?,
            approach_descent_rate:     number("rzdescapx")?,
            max_approach_descent_rate: number("rzmxdesapx")?,
            cruise_descent_rate:       number("rzdescrz")?,
            max_cruise_descent_rate:   number("rzmxdescrz")?,
            speed_change_rate:         number("razvarvel")?,
            max_speed_change_rate:     number("rzmxvarvel")?,
        })
    }

    /// Report inconsistent bands.  An empty list means the record is usable.
    pub fn validate(&self) -> Vec<PerfIssue> {
        let mut issues = Vec::new();
        if self.ceiling_fl <= 0.0 {
            issues.push(PerfIssue::NonPositiveCeiling(self.ceiling_fl));
        }

        let pairs: [(&'static str, f64, f64); 6] = [
            ("cruise_speed",          self.cruise_speed,          self.max_cruise_speed),
            ("takeoff_climb_rate",    self.takeoff_climb_rate,    self.max_takeoff_climb_rate),
            ("cruise_climb_rate",     self.cruise_climb_rate,     self.max_cruise_climb_rate),
            ("approach_descent_rate", self.approach_descent_rate, self.max_approach_descent_rate),
            ("cruise_descent_rate",   self.cruise_descent_rate,   self.max_cruise_descent_rate),
            ("speed_change_rate",     self.speed_change_rate,     self.max_speed_change_rate),
        ];
        for (field, value, maximum) in pairs {
            if value > maximum {
                issues.push(PerfIssue::AboveMaximum { field, value, maximum });
            }
        }
        issues
    }
}
