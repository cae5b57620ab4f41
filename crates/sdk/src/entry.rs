//! Schema projection and numeric bounds

use serde::{Deserialize, Serialize};

use crate::kind::{EntryKind, ValueKind};

/// Build the stable identifier of an entry: `OwnerType:Name`
pub fn entry_id(owner_type: &str, name: &str) -> String {
    format!("{}:{}", owner_type, name)
}

/// Inclusive `[min, max]` bounds
///
/// NaN means "no bound" on that side. It is kept as a distinct sentinel so a
/// real bound of `0` is never confused with an absent one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Bounds that accept every value
    pub const UNBOUNDED: Bounds = Bounds {
        min: f64::NAN,
        max: f64::NAN,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Lower bound, if any
    pub fn min(&self) -> Option<f64> {
        (!self.min.is_nan()).then_some(self.min)
    }

    /// Upper bound, if any
    pub fn max(&self) -> Option<f64> {
        (!self.max.is_nan()).then_some(self.max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_nan() && self.max.is_nan()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl PartialEq for Bounds {
    // NaN sentinels compare equal to each other
    fn eq(&self, other: &Self) -> bool {
        self.min() == other.min() && self.max() == other.max()
    }
}

/// Consumer-facing projection of a schema entry
///
/// Derived from the registry's schema entry; never mutated on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweakEntry {
    pub id: String,
    pub name: String,
    pub label: String,
    pub category: String,
    pub kind: EntryKind,
    pub value_kind: ValueKind,
}
