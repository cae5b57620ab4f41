//! Collection and dictionary coercion
//!
//! Each container type declares up front how it is decoded from and encoded
//! to the external representation, so no runtime type tokens are needed.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

use livetweak_sdk::RawValue;
use serde_json::Map;

use super::{coerce_scalar, describe, scalar_to_raw, TweakScalar};
use crate::error::{TweakError, TweakResult};

/// Homogeneous collection of scalars
pub trait TweakCollection: Clone + Send + Sync + 'static {
    type Element: TweakScalar;

    /// Destination type name used in error messages
    fn type_name() -> String;

    /// Build from already-coerced elements, order preserved
    fn from_elements(elements: Vec<Self::Element>) -> Self;

    /// Elements in order
    fn elements(&self) -> Vec<&Self::Element>;
}

impl<T: TweakScalar> TweakCollection for Vec<T> {
    type Element = T;

    fn type_name() -> String {
        format!("Vec<{}>", T::type_name())
    }

    fn from_elements(elements: Vec<T>) -> Self {
        elements
    }

    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T: TweakScalar> TweakCollection for VecDeque<T> {
    type Element = T;

    fn type_name() -> String {
        format!("VecDeque<{}>", T::type_name())
    }

    fn from_elements(elements: Vec<T>) -> Self {
        elements.into()
    }

    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

/// Coerce a raw value into a collection
///
/// Accepts a JSON array, a string holding a JSON array, or a comma-separated
/// string. Each element is coerced on its own against the element type.
pub fn coerce_list<L: TweakCollection>(raw: &RawValue) -> TweakResult<L> {
    let items: Vec<RawValue> = match raw {
        RawValue::Array(items) => items.clone(),
        RawValue::String(s) => split_list_text(s)
            .ok_or_else(|| TweakError::type_mismatch(s.clone(), L::type_name()))?,
        other => return Err(TweakError::type_mismatch(describe(other), L::type_name())),
    };

    let elements = items
        .iter()
        .map(coerce_scalar::<L::Element>)
        .collect::<TweakResult<Vec<_>>>()?;
    Ok(L::from_elements(elements))
}

fn split_list_text(s: &str) -> Option<Vec<RawValue>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).ok();
    }
    Some(
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| RawValue::String(part.to_string()))
            .collect(),
    )
}

/// Serialize a collection to a JSON array of strings
pub fn list_to_raw<L: TweakCollection>(list: &L) -> RawValue {
    RawValue::Array(list.elements().into_iter().map(scalar_to_raw).collect())
}

/// Keyed map with independently coerced keys and values
pub trait TweakMap: Clone + Send + Sync + 'static {
    type Key: Clone + Send + Sync + 'static;
    type Value: Clone + Send + Sync + 'static;

    /// Destination type name used in error messages
    fn type_name() -> String;
    fn key_type() -> String;
    fn value_type() -> String;

    fn coerce_key(text: &str) -> TweakResult<Self::Key>;
    fn coerce_value(raw: &RawValue) -> TweakResult<Self::Value>;

    /// Canonical text of a key, as used by [`encode`](Self::encode)
    fn key_text(key: &Self::Key) -> String;

    /// Build from already-coerced entries
    fn from_entries(entries: Vec<(Self::Key, Self::Value)>) -> Self;

    /// Insert or overwrite one entry
    fn insert_entry(&mut self, key: Self::Key, value: Self::Value);

    /// Serialized entries in iteration order
    fn encode(&self) -> Vec<(String, RawValue)>;
}

impl<K, V> TweakMap for HashMap<K, V>
where
    K: TweakScalar + Eq + Hash,
    V: TweakScalar,
{
    type Key = K;
    type Value = V;

    fn type_name() -> String {
        format!("HashMap<{}, {}>", K::type_name(), V::type_name())
    }

    fn key_type() -> String {
        K::type_name().to_string()
    }

    fn value_type() -> String {
        V::type_name().to_string()
    }

    fn coerce_key(text: &str) -> TweakResult<K> {
        K::parse_value(text).ok_or_else(|| TweakError::type_mismatch(text, K::type_name()))
    }

    fn coerce_value(raw: &RawValue) -> TweakResult<V> {
        coerce_scalar(raw)
    }

    fn key_text(key: &K) -> String {
        key.to_string_value()
    }

    fn from_entries(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn encode(&self) -> Vec<(String, RawValue)> {
        self.iter()
            .map(|(k, v)| (k.to_string_value(), scalar_to_raw(v)))
            .collect()
    }
}

impl<K, V> TweakMap for BTreeMap<K, V>
where
    K: TweakScalar + Ord,
    V: TweakScalar,
{
    type Key = K;
    type Value = V;

    fn type_name() -> String {
        format!("BTreeMap<{}, {}>", K::type_name(), V::type_name())
    }

    fn key_type() -> String {
        K::type_name().to_string()
    }

    fn value_type() -> String {
        V::type_name().to_string()
    }

    fn coerce_key(text: &str) -> TweakResult<K> {
        K::parse_value(text).ok_or_else(|| TweakError::type_mismatch(text, K::type_name()))
    }

    fn coerce_value(raw: &RawValue) -> TweakResult<V> {
        coerce_scalar(raw)
    }

    fn key_text(key: &K) -> String {
        key.to_string_value()
    }

    fn from_entries(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn encode(&self) -> Vec<(String, RawValue)> {
        self.iter()
            .map(|(k, v)| (k.to_string_value(), scalar_to_raw(v)))
            .collect()
    }
}

/// Loosely-typed map: values are copied verbatim, never re-typed
impl TweakMap for Map<String, RawValue> {
    type Key = String;
    type Value = RawValue;

    fn type_name() -> String {
        "Map<String, Value>".to_string()
    }

    fn key_type() -> String {
        "String".to_string()
    }

    fn value_type() -> String {
        "Value".to_string()
    }

    fn coerce_key(text: &str) -> TweakResult<String> {
        Ok(text.to_string())
    }

    fn coerce_value(raw: &RawValue) -> TweakResult<RawValue> {
        Ok(raw.clone())
    }

    fn key_text(key: &String) -> String {
        key.clone()
    }

    fn from_entries(entries: Vec<(String, RawValue)>) -> Self {
        entries.into_iter().collect()
    }

    fn insert_entry(&mut self, key: String, value: RawValue) {
        self.insert(key, value);
    }

    fn encode(&self) -> Vec<(String, RawValue)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Coerce a raw value into a map
///
/// Accepts a JSON object or a string holding one. Every key and value is
/// coerced before the map is assembled.
pub fn coerce_map<M: TweakMap>(raw: &RawValue) -> TweakResult<M> {
    let parsed;
    let object = match raw {
        RawValue::Object(object) => object,
        RawValue::String(s) => {
            parsed = serde_json::from_str::<Map<String, RawValue>>(s.trim())
                .map_err(|_| TweakError::type_mismatch(s.clone(), M::type_name()))?;
            &parsed
        }
        other => return Err(TweakError::type_mismatch(describe(other), M::type_name())),
    };

    let entries = object
        .iter()
        .map(|(k, v)| -> TweakResult<(M::Key, M::Value)> {
            Ok((M::coerce_key(k)?, M::coerce_value(v)?))
        })
        .collect::<TweakResult<Vec<_>>>()?;
    Ok(M::from_entries(entries))
}

/// Serialize a map to a JSON object
pub fn map_to_raw<M: TweakMap>(map: &M) -> RawValue {
    RawValue::Object(map.encode().into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_from_array() {
        let v: Vec<i32> = coerce_list(&json!([1, "2", 3])).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_list_from_text() {
        let v: Vec<f32> = coerce_list(&json!("0.5, 1.5 ,2")).unwrap();
        assert_eq!(v, vec![0.5, 1.5, 2.0]);

        let v: Vec<i64> = coerce_list(&json!("[4, 5]")).unwrap();
        assert_eq!(v, vec![4, 5]);

        let v: Vec<String> = coerce_list(&json!("  ")).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_list_bad_element_reports_element() {
        let err = coerce_list::<Vec<i32>>(&json!([1, "x", 3])).unwrap_err();
        assert_eq!(err, TweakError::type_mismatch("x", "i32"));
    }

    #[test]
    fn test_list_wrong_shape() {
        let err = coerce_list::<VecDeque<bool>>(&json!({"a": 1})).unwrap_err();
        assert!(err.to_string().contains("VecDeque<bool>"));
    }

    #[test]
    fn test_list_round_trip_preserves_order() {
        let original = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        let back: Vec<String> = coerce_list(&list_to_raw(&original)).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_typed_map() {
        let m: HashMap<i32, bool> = coerce_map(&json!({"1": true, "2": "off"})).unwrap();
        assert_eq!(m.get(&1), Some(&true));
        assert_eq!(m.get(&2), Some(&false));
    }

    #[test]
    fn test_map_bad_key_is_atomic_error() {
        let err = coerce_map::<BTreeMap<i32, i32>>(&json!({"1": 10, "two": 20})).unwrap_err();
        assert_eq!(err, TweakError::type_mismatch("two", "i32"));
    }

    #[test]
    fn test_map_from_text() {
        let m: BTreeMap<String, String> = coerce_map(&json!(r#"{"Jump":"Q"}"#)).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m["Jump"], "Q");

        assert!(coerce_map::<BTreeMap<String, String>>(&json!("not json")).is_err());
        assert!(coerce_map::<BTreeMap<String, String>>(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_loose_map_keeps_values() {
        let m: Map<String, RawValue> = coerce_map(&json!({"a": [1, 2], "b": {"c": null}})).unwrap();
        assert_eq!(m["a"], json!([1, 2]));
        assert_eq!(m["b"], json!({"c": null}));
    }

    #[test]
    fn test_map_round_trip() {
        let original: BTreeMap<i64, f64> = [(1, 0.5), (-7, 1e-3), (42, -2.0)].into_iter().collect();
        let back: BTreeMap<i64, f64> = coerce_map(&map_to_raw(&original)).unwrap();
        assert_eq!(back, original);
    }
}
