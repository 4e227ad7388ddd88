//! `trk-perf`: aircraft performance records keyed by designator.
//!
//! Performance data arrives as an already-parsed document: a root element
//! carrying the file signature plus one key-value map per aircraft type.
//! This crate checks the signature, types the fields, and keeps the records
//! in a [`PerformanceTable`].
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`document`] | `PerformanceDocument` (parsed input, JSON loader)     |
//! | [`record`]   | `PerformanceRecord`, `WakeCategory`, `PerfIssue`      |
//! | [`table`]    | `PerformanceTable`, `LoadReport`                      |
//! | [`error`]    | `PerfError`, `PerfResult<T>`                          |

pub mod document;
pub mod error;
pub mod record;
pub mod table;

#[cfg(test)]
mod tests;

pub use document::{PerformanceDocument, load_performance_json, load_performance_reader};
pub use error::{PerfError, PerfResult};
pub use record::{PerfIssue, PerformanceRecord, WakeCategory};
pub use table::{LoadReport, PerformanceTable};
