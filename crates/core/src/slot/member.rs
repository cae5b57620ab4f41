//! Type-erased member slots
//!
//! The registry holds heterogeneous members behind three object-safe
//! traits, one per entry shape. Each generic wrapper pairs a concrete value
//! type with its [`Storage`] and performs coercion, validation and the write
//! as one step, so a failed conversion never reaches storage.

use std::any::Any;
use std::marker::PhantomData;

use livetweak_sdk::{Bounds, RawValue, ValueKind};

use super::storage::{Storage, StoreError};
use crate::coerce::{
    check_bounds, coerce_list, coerce_map, coerce_scalar, list_to_raw, map_to_raw, scalar_to_raw,
    TweakCollection, TweakMap, TweakScalar,
};
use crate::error::{TweakError, TweakResult};

/// A successfully written value, kept typed for change hooks
pub struct Written {
    value: Box<dyn Any + Send>,
    key: Option<Box<dyn Any + Send>>,
    raw: RawValue,
}

impl Written {
    /// `raw` is the external form of `value`
    pub fn new<V: Any + Send>(value: V, raw: RawValue) -> Self {
        Self {
            value: Box::new(value),
            key: None,
            raw,
        }
    }

    /// Attach the dictionary key that was written (builder pattern)
    pub fn with_key<K: Any + Send>(mut self, key: K) -> Self {
        self.key = Some(Box::new(key));
        self
    }

    /// The new value, as the member's concrete type
    pub fn value(&self) -> &dyn Any {
        self.value.as_ref()
    }

    /// The written key, for keyed dictionary writes
    pub fn key(&self) -> Option<&dyn Any> {
        self.key.as_deref().map(|key| key as &dyn Any)
    }

    /// External form of the new value
    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    pub fn into_raw(self) -> RawValue {
        self.raw
    }
}

impl std::fmt::Debug for Written {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Written")
            .field("raw", &self.raw)
            .field("has_key", &self.key.is_some())
            .finish_non_exhaustive()
    }
}

fn store_failed(member: &str, _err: StoreError) -> TweakError {
    TweakError::NotWritable {
        member: member.to_string(),
    }
}

/// Scalar or enum member
pub trait ValueSlot: Send + Sync {
    fn kind(&self) -> ValueKind;
    fn type_name(&self) -> &'static str;
    fn enum_type(&self) -> Option<&'static str>;

    /// Current value in external form
    fn read(&self) -> Option<RawValue>;

    /// Coerce, bounds-check, then store
    fn write(&self, member: &str, raw: &RawValue, bounds: &Bounds) -> TweakResult<Written>;
}

/// Keyed map member
pub trait DictionarySlot: Send + Sync {
    fn type_name(&self) -> String;
    fn key_type(&self) -> String;
    fn value_type(&self) -> String;

    /// Current map as a JSON object
    fn read(&self) -> Option<RawValue>;

    /// Current entries in iteration order
    fn snapshot(&self) -> Option<Vec<(String, RawValue)>>;

    /// Replace the whole map
    fn replace(&self, member: &str, raw: &RawValue) -> TweakResult<Written>;

    /// Coerce a key and render it the way [`snapshot`](Self::snapshot) does
    fn canonical_key(&self, key: &str) -> TweakResult<String>;

    /// Overwrite one key in the current map, leaving other keys untouched
    fn merge_entry(&self, member: &str, key: &str, value: &RawValue) -> TweakResult<Written>;
}

/// Homogeneous collection member
pub trait CollectionSlot: Send + Sync {
    fn type_name(&self) -> String;
    fn element_type(&self) -> &'static str;

    /// Current elements as a JSON array
    fn read(&self) -> Option<RawValue>;

    /// Current elements in order
    fn snapshot(&self) -> Option<Vec<RawValue>>;

    /// Replace the whole collection
    fn replace(&self, member: &str, raw: &RawValue) -> TweakResult<Written>;
}

/// [`ValueSlot`] over a scalar storage
pub struct ScalarMember<T, S> {
    storage: S,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> ScalarMember<T, S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }
}

impl<T: TweakScalar, S: Storage<T>> ValueSlot for ScalarMember<T, S> {
    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn enum_type(&self) -> Option<&'static str> {
        T::enum_type()
    }

    fn read(&self) -> Option<RawValue> {
        self.storage.load().map(|v| scalar_to_raw(&v))
    }

    fn write(&self, member: &str, raw: &RawValue, bounds: &Bounds) -> TweakResult<Written> {
        let value: T = coerce_scalar(raw)?;
        check_bounds(&value, bounds)?;
        self.storage
            .store(value.clone())
            .map_err(|e| store_failed(member, e))?;
        let raw = scalar_to_raw(&value);
        Ok(Written::new(value, raw))
    }
}

/// [`DictionarySlot`] over a map storage
pub struct MapMember<M, S> {
    storage: S,
    _marker: PhantomData<fn() -> M>,
}

impl<M, S> MapMember<M, S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }
}

impl<M: TweakMap, S: Storage<M>> DictionarySlot for MapMember<M, S> {
    fn type_name(&self) -> String {
        M::type_name()
    }

    fn key_type(&self) -> String {
        M::key_type()
    }

    fn value_type(&self) -> String {
        M::value_type()
    }

    fn read(&self) -> Option<RawValue> {
        self.storage.load().map(|m| map_to_raw(&m))
    }

    fn snapshot(&self) -> Option<Vec<(String, RawValue)>> {
        self.storage.load().map(|m| m.encode())
    }

    fn replace(&self, member: &str, raw: &RawValue) -> TweakResult<Written> {
        let map: M = coerce_map(raw)?;
        self.storage
            .store(map.clone())
            .map_err(|e| store_failed(member, e))?;
        let raw = map_to_raw(&map);
        Ok(Written::new(map, raw))
    }

    fn canonical_key(&self, key: &str) -> TweakResult<String> {
        M::coerce_key(key).map(|k| M::key_text(&k))
    }

    fn merge_entry(&self, member: &str, key: &str, value: &RawValue) -> TweakResult<Written> {
        let typed_key = M::coerce_key(key)?;
        let typed_value = M::coerce_value(value)?;

        let mut updated: Option<M> = None;
        self.storage
            .modify(&mut |map: &mut M| {
                map.insert_entry(typed_key.clone(), typed_value.clone());
                updated = Some(map.clone());
            })
            .map_err(|e| store_failed(member, e))?;

        let map = updated.ok_or_else(|| store_failed(member, StoreError::Unreadable))?;
        let raw = map_to_raw(&map);
        Ok(Written::new(map, raw).with_key(typed_key))
    }
}

/// [`CollectionSlot`] over a collection storage
pub struct ListMember<L, S> {
    storage: S,
    _marker: PhantomData<fn() -> L>,
}

impl<L, S> ListMember<L, S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }
}

impl<L: TweakCollection, S: Storage<L>> CollectionSlot for ListMember<L, S> {
    fn type_name(&self) -> String {
        L::type_name()
    }

    fn element_type(&self) -> &'static str {
        L::Element::type_name()
    }

    fn read(&self) -> Option<RawValue> {
        self.storage.load().map(|l| list_to_raw(&l))
    }

    fn snapshot(&self) -> Option<Vec<RawValue>> {
        self.storage
            .load()
            .map(|l| l.elements().into_iter().map(scalar_to_raw).collect())
    }

    fn replace(&self, member: &str, raw: &RawValue) -> TweakResult<Written> {
        let list: L = coerce_list(raw)?;
        self.storage
            .store(list.clone())
            .map_err(|e| store_failed(member, e))?;
        let raw = list_to_raw(&list);
        Ok(Written::new(list, raw))
    }
}
