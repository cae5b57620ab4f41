//! Schema model - canonical description of every tweakable entry
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │  #[tweak] / TweakSet         │     │  SchemaBuilder               │
//! │   MemberMarker + Storage<T>  │ ──▶ │   label/category defaults    │
//! │   ActionMarker + ActionFn    │     │   default value snapshot     │
//! └──────────────────────────────┘     └──────────────┬───────────────┘
//!                                                     │
//!                                                     ▼
//!                                      ┌──────────────────────────────┐
//!                                      │  SchemaEntry                 │
//!                                      │   Value / Dictionary /       │
//!                                      │   Collection / Action        │
//!                                      └──────────────┬───────────────┘
//!                                                     │ project()
//!                                                     ▼
//!                                      ┌──────────────────────────────┐
//!                                      │  TweakEntry (livetweak-sdk)  │
//!                                      └──────────────────────────────┘
//! ```
//!
//! A schema entry is an immutable snapshot taken at scan time. It holds the
//! captured defaults and a handle to live storage, never the current value.

mod builder;

use std::sync::Arc;

use livetweak_sdk::{entry_id, Bounds, EntryKind, RawValue, TweakEntry, ValueKind};

use crate::action::ActionFn;
use crate::slot::{CollectionSlot, DictionarySlot, ValueSlot};

pub use builder::SchemaBuilder;

/// Identity and presentation metadata shared by all entry variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    /// Fully-qualified owner name
    pub owner_type: String,
    /// Member name
    pub name: String,
    pub label: String,
    pub category: String,
}

impl EntryMeta {
    /// `owner:name`
    pub fn id(&self) -> String {
        entry_id(&self.owner_type, &self.name)
    }
}

/// Scalar or enum entry
#[derive(Clone)]
pub struct ValueEntry {
    pub kind: ValueKind,
    pub bounds: Bounds,
    /// Value captured at scan time; `None` if it could not be read
    pub default_value: Option<RawValue>,
    pub callback: Option<String>,
    pub enum_type: Option<String>,
    pub slot: Arc<dyn ValueSlot>,
}

/// Keyed map entry
#[derive(Clone)]
pub struct DictionaryEntry {
    pub key_type: String,
    pub value_type: String,
    /// Keys in scan-time order
    pub keys: Vec<String>,
    /// Full key/value snapshot taken at scan time; `None` if it could not be read
    pub defaults: Option<Vec<(String, RawValue)>>,
    /// Entry-count bounds (recorded, not enforced)
    pub bounds: Bounds,
    pub callback: Option<String>,
    pub slot: Arc<dyn DictionarySlot>,
}

impl DictionaryEntry {
    /// Captured defaults as a JSON object
    pub fn defaults_object(&self) -> Option<RawValue> {
        self.defaults
            .as_ref()
            .map(|defaults| RawValue::Object(defaults.iter().cloned().collect()))
    }

    /// Captured default for one key, matched on its canonical text
    pub fn default_for(&self, key: &str) -> Option<&RawValue> {
        self.defaults
            .as_deref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

/// Homogeneous collection entry
#[derive(Clone)]
pub struct CollectionEntry {
    pub element_type: String,
    /// Elements captured at scan time; `None` if they could not be read
    pub defaults: Option<Vec<RawValue>>,
    /// Element-count bounds (recorded, not enforced)
    pub bounds: Bounds,
    pub callback: Option<String>,
    pub slot: Arc<dyn CollectionSlot>,
}

impl CollectionEntry {
    pub fn defaults_array(&self) -> Option<RawValue> {
        self.defaults.clone().map(RawValue::Array)
    }
}

/// Zero-argument action entry
#[derive(Clone)]
pub struct ActionEntry {
    pub invoke: ActionFn,
}

/// Variant-specific part of a schema entry
#[derive(Clone)]
pub enum EntryBody {
    Value(ValueEntry),
    Dictionary(DictionaryEntry),
    Collection(CollectionEntry),
    Action(ActionEntry),
}

/// One tweakable entry
#[derive(Clone)]
pub struct SchemaEntry {
    pub meta: EntryMeta,
    pub body: EntryBody,
}

impl SchemaEntry {
    pub fn id(&self) -> String {
        self.meta.id()
    }

    pub fn kind(&self) -> EntryKind {
        match self.body {
            EntryBody::Value(_) => EntryKind::Value,
            EntryBody::Dictionary(_) => EntryKind::Dictionary,
            EntryBody::Collection(_) => EntryKind::Collection,
            EntryBody::Action(_) => EntryKind::Action,
        }
    }

    /// Name of the change hook, for entries that have one
    pub fn callback(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Value(v) => v.callback.as_deref(),
            EntryBody::Dictionary(d) => d.callback.as_deref(),
            EntryBody::Collection(c) => c.callback.as_deref(),
            EntryBody::Action(_) => None,
        }
    }

    /// Live value re-read from storage
    pub fn current_value(&self) -> Option<RawValue> {
        match &self.body {
            EntryBody::Value(v) => v.slot.read(),
            EntryBody::Dictionary(d) => d.slot.read(),
            EntryBody::Collection(c) => c.slot.read(),
            EntryBody::Action(_) => None,
        }
    }

    /// Consumer-facing projection
    pub fn project(&self) -> TweakEntry {
        let value_kind = match &self.body {
            EntryBody::Value(v) => v.kind,
            _ => ValueKind::Unknown,
        };
        TweakEntry {
            id: self.id(),
            name: self.meta.name.clone(),
            label: self.meta.label.clone(),
            category: self.meta.category.clone(),
            kind: self.kind(),
            value_kind,
        }
    }
}

impl std::fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("label", &self.meta.label)
            .field("category", &self.meta.category)
            .finish_non_exhaustive()
    }
}
