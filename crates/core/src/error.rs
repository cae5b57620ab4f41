//! Error types for registry and dispatch operations
//!
//! Every variant's `Display` output is the message reported back in a failed
//! [`TweakCommandResult`](livetweak_sdk::TweakCommandResult).

use livetweak_sdk::{EntryKind, TweakCommandType};

/// Which side of a `[min, max]` interval a value fell out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Minimum,
    Maximum,
}

impl std::fmt::Display for BoundSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimum => f.write_str("below minimum"),
            Self::Maximum => f.write_str("above maximum"),
        }
    }
}

/// Error type for registry and dispatch operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TweakError {
    /// No entry with the requested id
    #[error("Entry not found")]
    NotFound,

    /// The entry exists but is not the kind the command operates on
    #[error("Entry '{id}' is a {actual} entry, {command:?} expects a {expected} entry")]
    VariantMismatch {
        id: String,
        command: TweakCommandType,
        expected: EntryKind,
        actual: EntryKind,
    },

    /// A raw value could not be converted to the destination type
    #[error("Cannot convert '{value}' to {target}")]
    TypeMismatch { value: String, target: String },

    /// A scalar value lies outside its declared bounds
    #[error("Value {value} {side} {bound}")]
    BoundsViolation {
        value: String,
        side: BoundSide,
        bound: f64,
    },

    /// The destination slot does not accept writes
    #[error("Member '{member}' is not writable")]
    NotWritable { member: String },

    /// A keyed revert named a key with no captured default
    #[error("Key '{key}' has no default value")]
    UnknownKey { key: String },

    /// Host storage panicked while being read or written
    #[error("Member '{member}' storage failed: {message}")]
    StorageFault { member: String, message: String },

    /// No instance could be located for an instance-bound action
    #[error("Instance of '{owner}' could not be resolved")]
    InstanceUnresolved { owner: String },

    /// An action returned an error or panicked
    #[error("{0}")]
    InvocationFailure(String),
}

impl TweakError {
    /// Build a [`TweakError::TypeMismatch`] for a raw value rendered as text
    pub fn type_mismatch(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::TypeMismatch {
            value: value.into(),
            target: target.into(),
        }
    }
}

/// Result type for registry operations
pub type TweakResult<T> = Result<T, TweakError>;

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
