//! Command Dispatcher
//!
//! Routes [`TweakCommand`]s against the registry index:
//!
//! 1. Build the index on first use
//! 2. Look up the entry id
//! 3. Check the entry kind against the command type
//! 4. Coerce, validate and write live storage, then notify the change hook
//!
//! Every failure is reported as a `{ok: false, message}` result; nothing
//! escapes `dispatch` as a panic or an error.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use dashmap::DashMap;
use livetweak_sdk::{RawValue, TweakCommand, TweakCommandResult, TweakCommandType, TweakEntry};
use parking_lot::{Mutex, RwLock};

use crate::action;
use crate::callback::{HookArgs, HookOutcome};
use crate::config::TweakConfig;
use crate::error::{panic_message, TweakError, TweakResult};
use crate::index::RegistryIndex;
use crate::scanner::{InventorySource, TweakSource};
use crate::schema::{
    CollectionEntry, DictionaryEntry, EntryBody, SchemaBuilder, SchemaEntry, ValueEntry,
};
use crate::slot::Written;

static NULL: RawValue = RawValue::Null;

/// Message and new value of a successful command
type Applied = (&'static str, Option<RawValue>);

/// Applies commands to tweakable entries
///
/// Features:
/// - Index built lazily on first use, replaced wholesale by [`rescan`](Self::rescan)
/// - Per-entry write lock around every Set/Revert
/// - Shareable across threads (`&self` everywhere)
pub struct Dispatcher {
    sources: Vec<Box<dyn TweakSource>>,
    builder: SchemaBuilder,
    index: RwLock<Option<Arc<RegistryIndex>>>,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher over every marker linked into the binary
    pub fn new() -> Self {
        Self::with_sources(vec![Box::new(InventorySource::all())])
    }

    /// Dispatcher over an explicit set of sources
    pub fn with_sources(sources: Vec<Box<dyn TweakSource>>) -> Self {
        Self {
            sources,
            builder: SchemaBuilder::new(),
            index: RwLock::new(None),
            write_locks: DashMap::new(),
        }
    }

    /// Add a source (builder pattern); takes effect on the next scan
    pub fn add_source(mut self, source: impl TweakSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Apply configuration (builder pattern)
    pub fn with_config(mut self, config: &TweakConfig) -> Self {
        self.builder = self
            .builder
            .with_default_category(config.default_category.clone());
        self
    }

    /// The current index, building it on first use
    pub fn index(&self) -> Arc<RegistryIndex> {
        if let Some(index) = self.index.read().as_ref() {
            return index.clone();
        }

        let built = Arc::new(RegistryIndex::build(&self.sources, &self.builder));
        self.index.write().get_or_insert(built).clone()
    }

    /// Discard the index and scan again
    ///
    /// Returns the number of entries in the new index. Write locks are kept,
    /// since a write started against the old index may still hold one.
    pub fn rescan(&self) -> usize {
        let built = Arc::new(RegistryIndex::build(&self.sources, &self.builder));
        let count = built.len();
        *self.index.write() = Some(built);
        count
    }

    /// Ordered schema of every entry
    pub fn schema(&self) -> Vec<TweakEntry> {
        self.index().schema()
    }

    pub fn entry(&self, id: &str) -> Option<SchemaEntry> {
        self.index().get(id).cloned()
    }

    /// Live value of an entry, re-read from storage
    ///
    /// `None` for actions, unknown ids and reads that panic.
    pub fn current_value(&self, id: &str) -> Option<RawValue> {
        let index = self.index();
        let entry = index.get(id)?;
        guarded(&entry.meta.name, || Ok(entry.current_value()))
            .ok()
            .flatten()
    }

    /// Apply one command
    pub fn dispatch(&self, command: &TweakCommand) -> TweakCommandResult {
        tracing::debug!(
            "Dispatching {:?} on '{}'",
            command.command_type,
            command.entry_id
        );

        match self.apply(command) {
            Ok((message, new_value)) => TweakCommandResult::success(message, new_value),
            Err(e) => {
                tracing::debug!("{:?} on '{}' failed: {}", command.command_type, command.entry_id, e);
                TweakCommandResult::failure(e.to_string())
            }
        }
    }

    fn apply(&self, command: &TweakCommand) -> TweakResult<Applied> {
        let index = self.index();
        let entry = index.get(&command.entry_id).ok_or(TweakError::NotFound)?;

        let expected = command.command_type.target_kind();
        if entry.kind() != expected {
            return Err(TweakError::VariantMismatch {
                id: command.entry_id.clone(),
                command: command.command_type,
                expected,
                actual: entry.kind(),
            });
        }

        let raw = command.value.as_ref().unwrap_or(&NULL);

        match (&entry.body, command.command_type) {
            (EntryBody::Value(value), TweakCommandType::SetValue) => self
                .set_value(&index, entry, value, raw)
                .map(|new_value| ("Set ok", Some(new_value))),
            (EntryBody::Value(value), TweakCommandType::RevertValue) => self
                .revert_value(&index, entry, value)
                .map(|new_value| ("Reverted", Some(new_value))),
            (EntryBody::Dictionary(dict), TweakCommandType::SetDictionaryValue) => self
                .write_entry(&index, entry, |name| dict.slot.replace(name, raw), || dict.slot.read())
                .map(|new_value| ("Set ok", Some(new_value))),
            (EntryBody::Dictionary(dict), TweakCommandType::RevertDictionaryValue) => self
                .revert_dictionary(&index, entry, dict, command.key.as_deref())
                .map(|new_value| ("Reverted", Some(new_value))),
            (EntryBody::Collection(list), TweakCommandType::SetCollectionValue) => self
                .write_entry(&index, entry, |name| list.slot.replace(name, raw), || list.slot.read())
                .map(|new_value| ("Set ok", Some(new_value))),
            (EntryBody::Collection(list), TweakCommandType::RevertCollectionValue) => self
                .revert_collection(&index, entry, list)
                .map(|new_value| ("Reverted", Some(new_value))),
            (EntryBody::Action(act), TweakCommandType::InvokeAction) => {
                action::invoke(&act.invoke).map(|()| ("Invoked", None))
            }
            // kinds were checked above
            _ => Err(TweakError::VariantMismatch {
                id: command.entry_id.clone(),
                command: command.command_type,
                expected,
                actual: entry.kind(),
            }),
        }
    }

    fn set_value(
        &self,
        index: &RegistryIndex,
        entry: &SchemaEntry,
        value: &ValueEntry,
        raw: &RawValue,
    ) -> TweakResult<RawValue> {
        self.write_entry(
            index,
            entry,
            |name| value.slot.write(name, raw, &value.bounds),
            || value.slot.read(),
        )
    }

    fn revert_value(
        &self,
        index: &RegistryIndex,
        entry: &SchemaEntry,
        value: &ValueEntry,
    ) -> TweakResult<RawValue> {
        match &value.default_value {
            Some(default) => self.set_value(index, entry, value, default),
            None => Err(TweakError::type_mismatch("null", value.slot.type_name())),
        }
    }

    fn revert_dictionary(
        &self,
        index: &RegistryIndex,
        entry: &SchemaEntry,
        dict: &DictionaryEntry,
        key: Option<&str>,
    ) -> TweakResult<RawValue> {
        let Some(key) = key else {
            let defaults = dict
                .defaults_object()
                .ok_or_else(|| TweakError::type_mismatch("null", dict.slot.type_name()))?;
            return self.write_entry(
                index,
                entry,
                |name| dict.slot.replace(name, &defaults),
                || dict.slot.read(),
            );
        };

        let canonical = dict.slot.canonical_key(key)?;
        let default = dict
            .default_for(&canonical)
            .ok_or_else(|| TweakError::UnknownKey {
                key: key.to_string(),
            })?;

        self.write_entry(
            index,
            entry,
            |name| dict.slot.merge_entry(name, &canonical, default),
            || dict.slot.read(),
        )
    }

    fn revert_collection(
        &self,
        index: &RegistryIndex,
        entry: &SchemaEntry,
        list: &CollectionEntry,
    ) -> TweakResult<RawValue> {
        let defaults = list
            .defaults_array()
            .ok_or_else(|| TweakError::type_mismatch("null", list.slot.type_name()))?;
        self.write_entry(
            index,
            entry,
            |name| list.slot.replace(name, &defaults),
            || list.slot.read(),
        )
    }

    /// Write under the entry's lock, notify, then re-read
    ///
    /// A panic in host storage fails the write. A panic in the re-read
    /// falls back to the value that was written.
    fn write_entry(
        &self,
        index: &RegistryIndex,
        entry: &SchemaEntry,
        write: impl FnOnce(&str) -> TweakResult<Written>,
        read: impl FnOnce() -> Option<RawValue>,
    ) -> TweakResult<RawValue> {
        let member = entry.meta.name.as_str();
        let written = {
            let lock = self.write_lock(&entry.id());
            let _guard = lock.lock();
            guarded(member, || write(member))?
        };

        self.notify(index, entry, &written);

        match guarded(member, || Ok(read())) {
            Ok(Some(current)) => Ok(current),
            Ok(None) => Ok(written.into_raw()),
            Err(e) => {
                tracing::warn!("Re-reading '{}' failed: {}", entry.id(), e);
                Ok(written.into_raw())
            }
        }
    }

    fn write_lock(&self, id: &str) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(id.to_string())
            .or_default()
            .value()
            .clone()
    }

    fn notify(&self, index: &RegistryIndex, entry: &SchemaEntry, written: &Written) {
        let Some(callback) = entry.callback() else {
            return;
        };

        let args = HookArgs {
            member: &entry.meta.name,
            key: written.key(),
            value: written.value(),
        };
        if index.hooks().invoke(&entry.meta.owner_type, callback, &args) == HookOutcome::NoMatch {
            tracing::debug!("'{}' changed, no matching '{}' hook", entry.id(), callback);
        }
    }
}

/// Run host storage code, turning a panic into [`TweakError::StorageFault`]
fn guarded<R>(member: &str, f: impl FnOnce() -> TweakResult<R>) -> TweakResult<R> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(TweakError::StorageFault {
            member: member.to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sources", &self.sources.len())
            .field("indexed", &self.index.read().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::Hook;
    use crate::scanner::TweakSet;
    use crate::slot::{Accessor, TweakCell};
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::LazyLock;

    fn dispatcher(set: TweakSet) -> Dispatcher {
        Dispatcher::with_sources(vec![Box::new(set)])
    }

    #[test]
    fn test_volume_scenario() {
        static VOLUME: TweakCell<f32> = TweakCell::new(0.8);
        let d = dispatcher(TweakSet::new("App.Config").cell("Volume", &VOLUME, |m| m.bounds(0.0, 1.0)));

        let result = d.dispatch(&TweakCommand::set_value("App.Config:Volume", "1.5"));
        assert!(!result.ok);
        assert!(result.message.contains("above maximum 1"), "{}", result.message);
        assert_eq!(VOLUME.get(), 0.8);

        let result = d.dispatch(&TweakCommand::set_value("App.Config:Volume", "0.5"));
        assert!(result.ok);
        assert_eq!(result.new_value, Some(json!("0.5")));

        let result = d.dispatch(&TweakCommand::revert_value("App.Config:Volume"));
        assert!(result.ok);
        assert_eq!(result.new_value, Some(json!("0.8")));
        assert_eq!(VOLUME.get(), 0.8);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        static LEVEL: TweakCell<i32> = TweakCell::new(5);
        let d = dispatcher(TweakSet::new("App.Level").cell("Level", &LEVEL, |m| m.bounds(1.0, 10.0)));

        assert!(d.dispatch(&TweakCommand::set_value("App.Level:Level", "1")).ok);
        assert!(d.dispatch(&TweakCommand::set_value("App.Level:Level", "10")).ok);
        assert!(!d.dispatch(&TweakCommand::set_value("App.Level:Level", "0")).ok);
        let result = d.dispatch(&TweakCommand::set_value("App.Level:Level", "11"));
        assert_eq!(result.message, "Value 11 above maximum 10");
        assert_eq!(LEVEL.get(), 10);
    }

    #[test]
    fn test_unknown_entry() {
        let d = dispatcher(TweakSet::new("App.Empty"));
        let result = d.dispatch(&TweakCommand::set_value("App.Empty:Nope", "1"));
        assert!(!result.ok);
        assert_eq!(result.message, "Entry not found");
        assert!(result.new_value.is_none());
    }

    #[test]
    fn test_variant_mismatch() {
        static FLAG: TweakCell<bool> = TweakCell::new(false);
        let d = dispatcher(TweakSet::new("App.Flags").cell("Flag", &FLAG, |m| m));

        let result = d.dispatch(&TweakCommand::invoke("App.Flags:Flag"));
        assert!(!result.ok);
        assert!(result.message.contains("value entry"), "{}", result.message);
        assert!(!FLAG.get());
    }

    #[test]
    fn test_type_mismatch_leaves_state() {
        static COUNT: TweakCell<i64> = TweakCell::new(7);
        let d = dispatcher(TweakSet::new("App.Counter").cell("Count", &COUNT, |m| m));

        let result = d.dispatch(&TweakCommand::set_value("App.Counter:Count", "seven"));
        assert_eq!(result.message, "Cannot convert 'seven' to i64");
        assert_eq!(COUNT.get(), 7);

        let result = d.dispatch(&TweakCommand::new(TweakCommandType::SetValue, "App.Counter:Count"));
        assert_eq!(result.message, "Cannot convert 'null' to i64");
    }

    #[test]
    fn test_dictionary_scenario() {
        static KEYS: LazyLock<TweakCell<BTreeMap<String, String>>> = LazyLock::new(|| {
            TweakCell::new(BTreeMap::from([
                ("Jump".to_string(), "Space".to_string()),
                ("Crouch".to_string(), "Ctrl".to_string()),
            ]))
        });
        let d = dispatcher(TweakSet::new("App.Input").cell("Keys", &KEYS, |m| m));

        let result = d.dispatch(&TweakCommand::set_dictionary("App.Input:Keys", json!({"Jump": "Q"})));
        assert!(result.ok, "{}", result.message);
        assert_eq!(d.current_value("App.Input:Keys"), Some(json!({"Jump": "Q"})));

        let result = d.dispatch(&TweakCommand::revert_dictionary("App.Input:Keys", Some("Jump".to_string())));
        assert!(result.ok, "{}", result.message);
        assert_eq!(result.new_value, Some(json!({"Jump": "Space"})));

        let result = d.dispatch(&TweakCommand::revert_dictionary("App.Input:Keys", None));
        assert!(result.ok);
        assert_eq!(result.new_value, Some(json!({"Crouch": "Ctrl", "Jump": "Space"})));
    }

    #[test]
    fn test_keyed_revert_touches_only_that_key() {
        static LIMITS: LazyLock<TweakCell<HashMap<i32, i32>>> =
            LazyLock::new(|| TweakCell::new(HashMap::from([(1, 10), (2, 20)])));
        let d = dispatcher(TweakSet::new("App.Limits").cell("Limits", &LIMITS, |m| m));

        assert!(d.dispatch(&TweakCommand::set_dictionary("App.Limits:Limits", json!({"1": 11, "2": 22}))).ok);

        let result = d.dispatch(&TweakCommand::revert_dictionary("App.Limits:Limits", Some("1".to_string())));
        assert!(result.ok, "{}", result.message);
        assert_eq!(LIMITS.get(), HashMap::from([(1, 10), (2, 22)]));

        let result = d.dispatch(&TweakCommand::revert_dictionary("App.Limits:Limits", Some(" 02".to_string())));
        assert!(result.ok, "{}", result.message);
        assert_eq!(LIMITS.get(), HashMap::from([(1, 10), (2, 20)]));

        let result = d.dispatch(&TweakCommand::revert_dictionary("App.Limits:Limits", Some("3".to_string())));
        assert_eq!(result.message, "Key '3' has no default value");
    }

    #[test]
    fn test_collection_set_and_revert() {
        static WAVES: LazyLock<TweakCell<Vec<i32>>> = LazyLock::new(|| TweakCell::new(vec![1, 2]));
        let d = dispatcher(TweakSet::new("App.Spawner").cell("Waves", &WAVES, |m| m));

        let result = d.dispatch(&TweakCommand::set_collection("App.Spawner:Waves", "3, 4, 5"));
        assert_eq!(result.new_value, Some(json!(["3", "4", "5"])));
        assert!(!d.dispatch(&TweakCommand::set_collection("App.Spawner:Waves", json!([6, "x"]))).ok);
        assert_eq!(WAVES.get(), vec![3, 4, 5]);

        let result = d.dispatch(&TweakCommand::revert_collection("App.Spawner:Waves"));
        assert!(result.ok);
        assert_eq!(WAVES.get(), vec![1, 2]);
    }

    #[test]
    fn test_not_writable() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let d = dispatcher(
            TweakSet::new("App.Fixed")
                .accessor("Seed", Accessor::read_only(|| 42_i32), |m| m.on_changed("OnSeed"))
                .hook("OnSeed", Hook::nullary(move || {
                    h.fetch_add(1, Ordering::SeqCst);
                })),
        );

        let result = d.dispatch(&TweakCommand::set_value("App.Fixed:Seed", "1"));
        assert_eq!(result.message, "Member 'Seed' is not writable");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_hook_panic_does_not_fail_write() {
        static SPEED: TweakCell<f64> = TweakCell::new(1.0);
        let d = dispatcher(
            TweakSet::new("App.Player")
                .cell("Speed", &SPEED, |m| m.on_changed("OnSpeed"))
                .hook("OnSpeed", Hook::value::<f64, _>(|_| panic!("listener broke"))),
        );

        let result = d.dispatch(&TweakCommand::set_value("App.Player:Speed", "2.5"));
        assert!(result.ok);
        assert_eq!(SPEED.get(), 2.5);
    }

    #[test]
    fn test_hook_receives_member_and_value() {
        static GAIN: TweakCell<f32> = TweakCell::new(0.0);
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        let d = dispatcher(
            TweakSet::new("App.Mixer")
                .cell("Gain", &GAIN, |m| m.on_changed("OnGain"))
                .hook("OnGain", Hook::member_value::<f32, _>(move |member, value| {
                    *s.lock() = Some((member.to_string(), *value));
                })),
        );

        d.dispatch(&TweakCommand::set_value("App.Mixer:Gain", "0.25"));
        assert_eq!(*seen.lock(), Some(("Gain".to_string(), 0.25)));
    }

    #[test]
    fn test_action_failure_and_success() {
        let runs = Arc::new(AtomicUsize::new(0));
        let r = runs.clone();
        let d = dispatcher(
            TweakSet::new("App.Tools")
                .action("Explode", || -> Result<(), String> { Err("Kaboom".to_string()) }, |a| a)
                .action::<(), _>("Panic", || panic!("Oops"), |a| a)
                .action("Count", move || {
                    r.fetch_add(1, Ordering::SeqCst);
                }, |a| a),
        );

        let result = d.dispatch(&TweakCommand::invoke("App.Tools:Explode"));
        assert!(!result.ok);
        assert_eq!(result.message, "Kaboom");

        let result = d.dispatch(&TweakCommand::invoke("App.Tools:Panic"));
        assert!(!result.ok);
        assert_eq!(result.message, "Oops");

        let result = d.dispatch(&TweakCommand::invoke("App.Tools:Count"));
        assert!(result.ok);
        assert_eq!(result.message, "Invoked");
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_defaults_survive_edits_and_rescan_recaptures() {
        static TITLE: TweakCell<String> = TweakCell::new(String::new());
        let d = dispatcher(TweakSet::new("App.Window").cell("Title", &TITLE, |m| m));

        d.dispatch(&TweakCommand::set_value("App.Window:Title", "first"));
        d.dispatch(&TweakCommand::set_value("App.Window:Title", "second"));
        let result = d.dispatch(&TweakCommand::revert_value("App.Window:Title"));
        assert_eq!(result.new_value, Some(json!("")));

        TITLE.set("rescanned".to_string());
        assert_eq!(d.rescan(), 1);
        d.dispatch(&TweakCommand::set_value("App.Window:Title", "third"));
        let result = d.dispatch(&TweakCommand::revert_value("App.Window:Title"));
        assert_eq!(result.new_value, Some(json!("rescanned")));
    }

    #[test]
    fn test_schema_and_entry() {
        static ON: TweakCell<bool> = TweakCell::new(true);
        let d = dispatcher(TweakSet::new("App.Debug").cell("On", &ON, |m| m.label("Enabled")))
            .with_config(&TweakConfig {
                default_category: "Debug".to_string(),
                ..TweakConfig::default()
            });

        let schema = d.schema();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema[0].label, "Enabled");
        assert_eq!(schema[0].category, "Debug");
        assert!(d.entry("App.Debug:On").is_some());
        assert_eq!(d.current_value("App.Debug:On"), Some(json!("true")));
    }

    #[test]
    fn test_panicking_setter_fails_the_write() {
        let d = dispatcher(TweakSet::new("App.Broken").accessor(
            "Speed",
            Accessor::new(|| 1_i32, |_v| panic!("setter broke")),
            |m| m,
        ));

        let result = d.dispatch(&TweakCommand::set_value("App.Broken:Speed", "2"));
        assert!(!result.ok);
        assert_eq!(result.message, "Member 'Speed' storage failed: setter broke");
        assert_eq!(d.current_value("App.Broken:Speed"), Some(json!("1")));
    }

    #[test]
    fn test_panicking_reread_falls_back_to_written_value() {
        let stored = Arc::new(Mutex::new(1_i32));
        let broken = Arc::new(AtomicBool::new(false));
        let (get_value, set_value) = (stored.clone(), stored.clone());
        let (get_broken, set_broken) = (broken.clone(), broken.clone());
        let d = dispatcher(TweakSet::new("App.Flaky").accessor(
            "Level",
            Accessor::new(
                move || {
                    assert!(!get_broken.load(Ordering::SeqCst), "getter broke");
                    *get_value.lock()
                },
                move |v| {
                    *set_value.lock() = v;
                    set_broken.store(true, Ordering::SeqCst);
                },
            ),
            |m| m,
        ));

        let result = d.dispatch(&TweakCommand::set_value("App.Flaky:Level", "2"));
        assert!(result.ok, "{}", result.message);
        assert_eq!(result.new_value, Some(json!("2")));
        assert_eq!(*stored.lock(), 2);
        assert_eq!(d.current_value("App.Flaky:Level"), None);
    }

    #[test]
    fn test_revert_without_captured_defaults_keeps_live_state() {
        let ready = Arc::new(AtomicBool::new(false));
        let map = Arc::new(Mutex::new(BTreeMap::from([("a".to_string(), "1".to_string())])));
        let list = Arc::new(Mutex::new(vec![7_i32]));
        let (map_ready, list_ready) = (ready.clone(), ready.clone());
        let (map_get, map_set) = (map.clone(), map.clone());
        let (list_get, list_set) = (list.clone(), list.clone());
        let d = dispatcher(
            TweakSet::new("App.Late")
                .accessor(
                    "Map",
                    Accessor::new(
                        move || {
                            assert!(map_ready.load(Ordering::SeqCst), "not ready");
                            map_get.lock().clone()
                        },
                        move |m| *map_set.lock() = m,
                    ),
                    |m| m,
                )
                .accessor(
                    "List",
                    Accessor::new(
                        move || {
                            assert!(list_ready.load(Ordering::SeqCst), "not ready");
                            list_get.lock().clone()
                        },
                        move |l| *list_set.lock() = l,
                    ),
                    |m| m,
                ),
        );
        assert_eq!(d.index().len(), 2);
        ready.store(true, Ordering::SeqCst);

        let result = d.dispatch(&TweakCommand::revert_dictionary("App.Late:Map", None));
        assert!(!result.ok);
        assert!(result.message.starts_with("Cannot convert 'null'"), "{}", result.message);

        let result = d.dispatch(&TweakCommand::revert_dictionary("App.Late:Map", Some("a".to_string())));
        assert_eq!(result.message, "Key 'a' has no default value");
        assert_eq!(*map.lock(), BTreeMap::from([("a".to_string(), "1".to_string())]));

        let result = d.dispatch(&TweakCommand::revert_collection("App.Late:List"));
        assert!(!result.ok);
        assert_eq!(*list.lock(), vec![7]);
    }

    #[test]
    fn test_nan_rejected_by_bounds() {
        static GAIN: TweakCell<f64> = TweakCell::new(0.5);
        let d = dispatcher(TweakSet::new("App.Mixer").cell("Gain", &GAIN, |m| m.bounds(0.0, 1.0)));

        let result = d.dispatch(&TweakCommand::set_value("App.Mixer:Gain", "NaN"));
        assert!(!result.ok);
        assert_eq!(result.message, "Value NaN below minimum 0");
        assert_eq!(GAIN.get(), 0.5);
    }

    #[test]
    fn test_rescan_keeps_write_locks() {
        static FLAG: TweakCell<bool> = TweakCell::new(false);
        let d = dispatcher(TweakSet::new("App.Flags").cell("Flag", &FLAG, |m| m));

        let before = d.write_lock("App.Flags:Flag");
        d.rescan();
        assert!(Arc::ptr_eq(&before, &d.write_lock("App.Flags:Flag")));
    }
}
