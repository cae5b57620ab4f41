//! livetweak SDK - Schema and Command Type Definitions
//!
//! This crate contains the data types exchanged between a host process that
//! exposes tweakable entries and whatever edits them (an editor window, a
//! socket bridge, a test). It depends only on serde, so editors can share it
//! without pulling in the registry itself.
//!
//! # Modules
//!
//! - [`kind`] - Entry and value kind enumerations
//! - [`entry`] - Schema projection and numeric bounds
//! - [`command`] - Command and result shapes for the dispatcher

pub mod command;
pub mod entry;
pub mod kind;

pub use command::{TweakCommand, TweakCommandResult, TweakCommandType};
pub use entry::{entry_id, Bounds, TweakEntry};
pub use kind::{EntryKind, ValueKind};

/// Loosely-typed external representation of a value
///
/// Scalars travel as JSON strings, collections as arrays and dictionaries as
/// objects. Numbers and booleans are accepted on input as well.
pub type RawValue = serde_json::Value;

/// Category assigned to entries whose marker does not name one
pub const DEFAULT_CATEGORY: &str = "General";
