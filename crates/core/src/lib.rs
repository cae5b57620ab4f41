//! livetweak - Core Registry
//!
//! This crate lets a running process expose selected in-memory state as live,
//! externally editable entries: scalar settings, dictionaries, collections
//! and zero-argument actions.
//!
//! - [`coerce`] - Type Coercion Engine
//! - [`slot`] - storage cells and type-erased member slots
//! - [`scanner`] / [`schema`] - discovery and the canonical schema model
//! - [`index`] - registry index built from a scan
//! - [`dispatcher`] - command routing, validation and writes
//! - [`callback`] - change hook resolution and invocation
//! - [`queue`] - cross-thread command queue
//!
//! # Example
//!
//! ```ignore
//! use livetweak_core::{tweak, Dispatcher, TweakCell, TweakCommand};
//!
//! #[tweak(label = "Master Volume", min = 0, max = 1, on_changed = "on_volume")]
//! static VOLUME: TweakCell<f32> = TweakCell::new(0.8);
//!
//! let dispatcher = Dispatcher::new();
//! let result = dispatcher.dispatch(&TweakCommand::set_value(
//!     concat!(module_path!(), ":VOLUME"),
//!     "0.5",
//! ));
//! assert!(result.ok);
//! ```

// Allow the crate to refer to itself as `livetweak_core` for proc macro compatibility
extern crate self as livetweak_core;

// Re-export the SDK crate
pub use livetweak_sdk as sdk;

// Used by the expansion of the marker macros
#[doc(hidden)]
pub use inventory;

pub mod action;
pub mod callback;
pub mod coerce;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod index;
pub mod logging;
pub mod marker;
pub mod queue;
pub mod scanner;
pub mod schema;
pub mod slot;

// Re-export commonly used items
pub use action::{resolve_instance, ActionOutcome, ActionOwner, ActionResult, Instance};
pub use callback::{Hook, HookArgs, HookTable};
pub use coerce::{TweakEnum, TweakScalar};
pub use dispatcher::Dispatcher;
pub use error::{TweakError, TweakResult};
pub use index::RegistryIndex;
pub use marker::{ActionMarker, MemberMarker, TweakRegistration};
pub use queue::{CommandQueue, QueueError};
pub use scanner::{InventorySource, TweakSet, TweakSource};
pub use schema::{SchemaBuilder, SchemaEntry};
pub use slot::{Accessor, ErasedMember, Storage, TweakCell, TweakShape};

// Re-export config types
pub use config::{ConfigError, ConfigFile, ConfigResult, TweakConfig};

// Re-export SDK types
pub use livetweak_sdk::{
    Bounds, EntryKind, RawValue, TweakCommand, TweakCommandResult, TweakCommandType, TweakEntry,
    ValueKind,
};

// Re-export macros
pub use livetweak_macros::{tweak, tweak_action, tweak_actions, tweak_hook, TweakEnum};
