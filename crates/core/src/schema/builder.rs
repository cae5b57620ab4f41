//! Schema Builder - markers plus erased members into schema entries

use std::borrow::Cow;
use std::panic::{catch_unwind, AssertUnwindSafe};

use livetweak_sdk::{Bounds, DEFAULT_CATEGORY};

use super::{
    ActionEntry, CollectionEntry, DictionaryEntry, EntryBody, EntryMeta, SchemaEntry, ValueEntry,
};
use crate::action::ActionFn;
use crate::error::panic_message;
use crate::marker::{ActionMarker, MemberMarker};
use crate::slot::ErasedMember;

/// Normalises marker metadata and captures scan-time defaults
///
/// Builds have no side effects on host state: each container is enumerated
/// exactly once, and a read that panics records no default.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    default_category: String,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Category for markers that do not name one
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Build the entry for a value, dictionary or collection member
    pub fn member(&self, marker: &MemberMarker, member: &ErasedMember) -> SchemaEntry {
        let meta = self.meta(
            &marker.owner,
            &marker.name,
            marker.label.as_deref(),
            marker.category.as_deref(),
        );
        let bounds = Bounds::new(marker.min, marker.max);
        let callback = marker
            .on_changed
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let id = meta.id();

        let body = match member {
            ErasedMember::Value(slot) => EntryBody::Value(ValueEntry {
                kind: slot.kind(),
                bounds,
                default_value: capture(&id, || slot.read()),
                callback,
                enum_type: slot.enum_type().map(str::to_string),
                slot: slot.clone(),
            }),
            ErasedMember::Dictionary(slot) => {
                let defaults = capture(&id, || slot.snapshot());
                EntryBody::Dictionary(DictionaryEntry {
                    key_type: slot.key_type(),
                    value_type: slot.value_type(),
                    keys: defaults
                        .iter()
                        .flatten()
                        .map(|(key, _)| key.clone())
                        .collect(),
                    defaults,
                    bounds,
                    callback,
                    slot: slot.clone(),
                })
            }
            ErasedMember::Collection(slot) => EntryBody::Collection(CollectionEntry {
                element_type: slot.element_type().to_string(),
                defaults: capture(&id, || slot.snapshot()),
                bounds,
                callback,
                slot: slot.clone(),
            }),
        };

        SchemaEntry { meta, body }
    }

    /// Build the entry for an action
    pub fn action(&self, marker: &ActionMarker, invoke: ActionFn) -> SchemaEntry {
        SchemaEntry {
            meta: self.meta(
                &marker.owner,
                &marker.name,
                marker.label.as_deref(),
                marker.category.as_deref(),
            ),
            body: EntryBody::Action(ActionEntry { invoke }),
        }
    }

    fn meta(
        &self,
        owner: &str,
        name: &str,
        label: Option<&str>,
        category: Option<&str>,
    ) -> EntryMeta {
        EntryMeta {
            owner_type: owner.to_string(),
            name: name.to_string(),
            label: non_empty(label).unwrap_or(Cow::Borrowed(name)).into_owned(),
            category: non_empty(category)
                .unwrap_or(Cow::Borrowed(self.default_category.as_str()))
                .into_owned(),
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<Cow<'_, str>> {
    text.filter(|t| !t.trim().is_empty()).map(Cow::Borrowed)
}

/// Read a scan-time value, treating a panicking read as absent
fn capture<R>(id: &str, read: impl FnOnce() -> Option<R>) -> Option<R> {
    match catch_unwind(AssertUnwindSafe(read)) {
        Ok(value) => value,
        Err(payload) => {
            tracing::warn!(
                "Reading default of '{}' panicked: {}",
                id,
                panic_message(payload.as_ref())
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::action_fn;
    use crate::slot::{erase_accessor, erase_static, Accessor, TweakCell};
    use livetweak_sdk::{EntryKind, ValueKind};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::LazyLock;

    static VOLUME: TweakCell<f32> = TweakCell::new(0.8);
    static BINDINGS: LazyLock<TweakCell<BTreeMap<String, String>>> = LazyLock::new(|| {
        TweakCell::new(BTreeMap::from([
            ("Crouch".to_string(), "Ctrl".to_string()),
            ("Jump".to_string(), "Space".to_string()),
        ]))
    });
    static WAVES: LazyLock<TweakCell<Vec<i32>>> = LazyLock::new(|| TweakCell::new(vec![1, 2, 3]));

    #[test]
    fn test_value_defaults() {
        let builder = SchemaBuilder::new();
        let marker = MemberMarker::new("App.Config", "Volume").bounds(0.0, 1.0);
        let entry = builder.member(&marker, &erase_static(&VOLUME));

        assert_eq!(entry.id(), "App.Config:Volume");
        assert_eq!(entry.meta.label, "Volume");
        assert_eq!(entry.meta.category, "General");
        assert_eq!(entry.kind(), EntryKind::Value);
        match &entry.body {
            EntryBody::Value(value) => {
                assert_eq!(value.kind, ValueKind::Float);
                assert_eq!(value.bounds, Bounds::new(0.0, 1.0));
                assert_eq!(value.default_value, Some(json!("0.8")));
                assert!(value.callback.is_none());
            }
            _ => panic!("expected value entry"),
        }
    }

    #[test]
    fn test_configured_category_and_blank_label() {
        let builder = SchemaBuilder::new().with_default_category("Misc");
        let marker = MemberMarker::new("App.Config", "Volume").label("  ");
        let entry = builder.member(&marker, &erase_static(&VOLUME));
        assert_eq!(entry.meta.label, "Volume");
        assert_eq!(entry.meta.category, "Misc");
    }

    #[test]
    fn test_dictionary_snapshot_is_independent() {
        let builder = SchemaBuilder::new();
        let marker = MemberMarker::new("App.Input", "Bindings");
        let entry = builder.member(&marker, &erase_static(&BINDINGS));

        BINDINGS.update(|map| {
            map.insert("Jump".to_string(), "Q".to_string());
        });

        match &entry.body {
            EntryBody::Dictionary(dict) => {
                assert_eq!(dict.keys, vec!["Crouch".to_string(), "Jump".to_string()]);
                assert_eq!(dict.default_for("Jump"), Some(&json!("Space")));
                assert!(dict.bounds.is_unbounded());
                assert_eq!(dict.key_type, "String");
            }
            _ => panic!("expected dictionary entry"),
        }
    }

    #[test]
    fn test_collection_snapshot() {
        let builder = SchemaBuilder::new();
        let entry = builder.member(&MemberMarker::new("App.Spawner", "Waves"), &erase_static(&WAVES));
        match &entry.body {
            EntryBody::Collection(list) => {
                assert_eq!(list.element_type, "i32");
                assert_eq!(list.defaults_array(), Some(json!(["1", "2", "3"])));
            }
            _ => panic!("expected collection entry"),
        }
    }

    #[test]
    fn test_panicking_read_yields_no_default() {
        let builder = SchemaBuilder::new();
        let member = erase_accessor(Accessor::<i32>::read_only(|| panic!("not ready")));
        let entry = builder.member(&MemberMarker::new("App.Late", "Value"), &member);
        match &entry.body {
            EntryBody::Value(value) => assert_eq!(value.default_value, None),
            _ => panic!("expected value entry"),
        }
    }

    #[test]
    fn test_panicking_container_read_records_no_defaults() {
        let builder = SchemaBuilder::new();
        let member = erase_accessor(Accessor::<BTreeMap<String, String>>::read_only(|| {
            panic!("not ready")
        }));
        match &builder.member(&MemberMarker::new("App.Late", "Map"), &member).body {
            EntryBody::Dictionary(dict) => {
                assert!(dict.defaults.is_none());
                assert!(dict.keys.is_empty());
                assert_eq!(dict.defaults_object(), None);
                assert_eq!(dict.default_for("a"), None);
            }
            _ => panic!("expected dictionary entry"),
        }

        let member = erase_accessor(Accessor::<Vec<i32>>::read_only(|| panic!("not ready")));
        match &builder.member(&MemberMarker::new("App.Late", "List"), &member).body {
            EntryBody::Collection(list) => assert_eq!(list.defaults_array(), None),
            _ => panic!("expected collection entry"),
        }
    }

    #[test]
    fn test_action_entry() {
        let builder = SchemaBuilder::new();
        let marker = ActionMarker::new("App.Tools", "Reset").label("Reset All").category("Tools");
        let entry = builder.action(&marker, action_fn(|| ()));
        assert_eq!(entry.kind(), EntryKind::Action);
        assert_eq!(entry.project().value_kind, ValueKind::Unknown);
        assert_eq!(entry.meta.label, "Reset All");
    }
}
