//! Fix table.
//!
//! # Layout
//!
//! Two hash maps, both `FxHashMap` (integer and short-string keys):
//!
//! ```text
//! by_id:        FixId → Fix
//! by_indicator: NORMALIZED → FixId      (normalized = trimmed + uppercase)
//! ```
//!
//! Every `by_indicator` entry points at an id present in `by_id`; the
//! builder enforces unique ids and unique normalized indicators.  Fixes with
//! an empty indicator are reachable by number only.
//!
//! The registry is built once at scenario load and never mutated afterwards,
//! so it is `Send + Sync` and shared as `Arc<FixRegistry>` without locking.

use rustc_hash::FxHashMap;

use trk_core::{FixId, GeoPoint};

use crate::{CoordsError, CoordsResult, ResolveStatus, ResolvedPosition};

/// Normalize a fix indicator for lookup: trim surrounding whitespace and
/// uppercase (full Unicode case mapping, so `"ção"` matches `"ÇÃO"`).
pub fn normalize_indicator(text: &str) -> String {
    text.trim().to_uppercase()
}

// ── Fix ───────────────────────────────────────────────────────────────────────

/// A numbered, named reference point with known geographic coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Fix {
    pub id:        FixId,
    pub indicator: String,
    pub position:  GeoPoint,
    /// Invalid fixes stay in the table but never resolve.
    pub valid:     bool,
}

impl Fix {
    pub fn new(id: FixId, indicator: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            indicator: indicator.into(),
            position:  GeoPoint::new(lat, lng),
            valid:     true,
        }
    }

    /// Builder-style override of the `valid` flag.
    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }
}

// ── FixRegistry ───────────────────────────────────────────────────────────────

/// Read-only lookup table of fixes by number and by indicator.
///
/// Do not construct directly; use [`FixRegistryBuilder`].
#[derive(Clone, Debug, Default)]
pub struct FixRegistry {
    by_id:        FxHashMap<FixId, Fix>,
    by_indicator: FxHashMap<String, FixId>,
}

impl FixRegistry {
    /// A registry with no fixes.  Every lookup returns `NotFound`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: FixId) -> Option<&Fix> {
        self.by_id.get(&id)
    }

    /// Iterate over all fixes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Fix> + '_ {
        self.by_id.values()
    }

    /// Fix number registered under `indicator` (normalized before lookup).
    pub fn lookup_indicator(&self, indicator: &str) -> Option<FixId> {
        self.by_indicator.get(&normalize_indicator(indicator)).copied()
    }

    /// Position of fix `id`.
    ///
    /// `NotFound` when the id is absent or the fix is flagged invalid.
    pub fn resolve_by_id(&self, id: FixId) -> ResolvedPosition {
        self.position_of(id).into()
    }

    /// Position of the fix registered under `indicator`.
    ///
    /// `" ab12 "` and `"AB12"` resolve identically.
    pub fn resolve_by_indicator(&self, indicator: &str) -> ResolvedPosition {
        self.lookup_indicator(indicator)
            .ok_or(ResolveStatus::NotFound)
            .and_then(|id| self.position_of(id))
            .into()
    }

    pub(crate) fn position_of(&self, id: FixId) -> Result<GeoPoint, ResolveStatus> {
        match self.by_id.get(&id) {
            Some(fix) if fix.valid => Ok(fix.position),
            _ => Err(ResolveStatus::NotFound),
        }
    }
}

// ── FixRegistryBuilder ────────────────────────────────────────────────────────

/// Incremental constructor for [`FixRegistry`] that enforces its invariants.
#[derive(Debug, Default)]
pub struct FixRegistryBuilder {
    registry: FixRegistry,
}

impl FixRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one fix.  Fails on a duplicate number or a duplicate normalized
    /// indicator; the builder is left unchanged on failure.
    pub fn insert(&mut self, fix: Fix) -> CoordsResult<&mut Self> {
        if self.registry.by_id.contains_key(&fix.id) {
            return Err(CoordsError::DuplicateFixId(fix.id));
        }

        let key = normalize_indicator(&fix.indicator);
        if !key.is_empty() {
            if let Some(&first) = self.registry.by_indicator.get(&key) {
                return Err(CoordsError::DuplicateIndicator {
                    indicator: key,
                    first,
                    second: fix.id,
                });
            }
            self.registry.by_indicator.insert(key, fix.id);
        }

        self.registry.by_id.insert(fix.id, fix);
        Ok(self)
    }

    /// Add every fix from `fixes`, stopping at the first invariant violation.
    pub fn extend<I: IntoIterator<Item = Fix>>(&mut self, fixes: I) -> CoordsResult<&mut Self> {
        for fix in fixes {
            self.insert(fix)?;
        }
        Ok(self)
    }

    pub fn build(self) -> FixRegistry {
        self.registry
    }
}

impl FixRegistry {
    /// Build a registry straight from a list of fixes.
    pub fn from_fixes<I: IntoIterator<Item = Fix>>(fixes: I) -> CoordsResult<Self> {
        let mut builder = FixRegistryBuilder::new();
        builder.extend(fixes)?;
        Ok(builder.build())
    }
}
