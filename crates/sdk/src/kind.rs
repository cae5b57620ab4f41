//! Kind enumerations for tweakable entries

use serde::{Deserialize, Serialize};

/// Scalar value kind of a value entry
///
/// Meaningful only for [`EntryKind::Value`]; every other entry kind reports
/// [`ValueKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueKind {
    #[default]
    Unknown,
    Boolean,
    Integer,
    Float,
    Double,
    String,
    Enum,
}

impl ValueKind {
    /// Check if values of this kind take part in `[min, max]` validation
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Double)
    }
}

/// Variant of a schema entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Value,
    Dictionary,
    Collection,
    Action,
}

impl EntryKind {
    /// Lowercase name used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Dictionary => "dictionary",
            Self::Collection => "collection",
            Self::Action => "action",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
