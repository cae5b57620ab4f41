//! Type Coercion Engine
//!
//! Converts between the loosely-typed external representation
//! ([`RawValue`](livetweak_sdk::RawValue)) and concretely-typed values:
//!
//! - scalars (`bool`, `i32`, `i64`, `f32`, `f64`, `String`) via [`TweakScalar`]
//! - fieldless enums via [`TweakEnum`] (case-insensitive name match)
//! - homogeneous collections via [`TweakCollection`]
//! - keyed maps via [`TweakMap`]
//!
//! Every conversion builds the complete new value before returning it, so a
//! failure anywhere leaves the caller with an error and nothing to write.
//!
//! # Example
//!
//! ```
//! use livetweak_core::coerce::{coerce_scalar, scalar_to_raw};
//! use serde_json::json;
//!
//! let v: f32 = coerce_scalar(&json!("0.5")).unwrap();
//! assert_eq!(v, 0.5);
//! assert_eq!(scalar_to_raw(&v), json!("0.5"));
//! ```

mod container;
mod scalar;

use std::borrow::Cow;

use livetweak_sdk::{Bounds, RawValue};

use crate::error::{BoundSide, TweakError, TweakResult};

pub use container::{coerce_list, coerce_map, list_to_raw, map_to_raw, TweakCollection, TweakMap};
pub use scalar::{parse_enum, TweakEnum, TweakScalar};

/// Text form of a scalar raw value
///
/// Strings are taken as-is, numbers and booleans are rendered. Null, arrays
/// and objects have no scalar text.
pub fn raw_text(raw: &RawValue) -> Option<Cow<'_, str>> {
    match raw {
        RawValue::String(s) => Some(Cow::Borrowed(s.as_str())),
        RawValue::Number(n) => Some(Cow::Owned(n.to_string())),
        RawValue::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// Render a raw value for error messages
pub fn describe(raw: &RawValue) -> String {
    match raw {
        RawValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce a raw value into a scalar
pub fn coerce_scalar<T: TweakScalar>(raw: &RawValue) -> TweakResult<T> {
    raw_text(raw)
        .and_then(|text| T::parse_value(&text))
        .ok_or_else(|| TweakError::type_mismatch(describe(raw), T::type_name()))
}

/// Serialize a scalar to its external representation
pub fn scalar_to_raw<T: TweakScalar>(value: &T) -> RawValue {
    RawValue::String(value.to_string_value())
}

/// Reject a scalar outside `[min, max]`, boundaries included
///
/// Non-numeric scalars always pass. NaN fails any declared bound.
pub fn check_bounds<T: TweakScalar>(value: &T, bounds: &Bounds) -> TweakResult<()> {
    if !T::KIND.is_numeric() {
        return Ok(());
    }
    let Some(x) = value.as_f64() else {
        return Ok(());
    };

    if let Some(min) = bounds.min() {
        if x.is_nan() || x < min {
            return Err(TweakError::BoundsViolation {
                value: value.to_string_value(),
                side: BoundSide::Minimum,
                bound: min,
            });
        }
    }
    if let Some(max) = bounds.max() {
        if x.is_nan() || x > max {
            return Err(TweakError::BoundsViolation {
                value: value.to_string_value(),
                side: BoundSide::Maximum,
                bound: max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_text() {
        assert_eq!(raw_text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(raw_text(&json!(1.5)).as_deref(), Some("1.5"));
        assert_eq!(raw_text(&json!(true)).as_deref(), Some("true"));
        assert!(raw_text(&json!(null)).is_none());
        assert!(raw_text(&json!([1])).is_none());
    }

    #[test]
    fn test_coerce_scalar_from_numbers_and_strings() {
        assert_eq!(coerce_scalar::<i32>(&json!(42)).unwrap(), 42);
        assert_eq!(coerce_scalar::<i32>(&json!("42")).unwrap(), 42);
        assert_eq!(coerce_scalar::<f64>(&json!(0.25)).unwrap(), 0.25);
        assert!(coerce_scalar::<bool>(&json!(true)).unwrap());
        assert_eq!(coerce_scalar::<String>(&json!("hi")).unwrap(), "hi");
    }

    #[test]
    fn test_coerce_scalar_failure_names_value_and_type() {
        let err = coerce_scalar::<i32>(&json!("twelve")).unwrap_err();
        assert_eq!(
            err,
            TweakError::TypeMismatch {
                value: "twelve".to_string(),
                target: "i32".to_string(),
            }
        );

        let err = coerce_scalar::<f32>(&json!(null)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot convert 'null' to f32");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = Bounds::new(0.0, 1.0);
        assert!(check_bounds(&0.0f32, &bounds).is_ok());
        assert!(check_bounds(&1.0f32, &bounds).is_ok());
        assert!(check_bounds(&0.5f64, &bounds).is_ok());

        let err = check_bounds(&1.5f32, &bounds).unwrap_err();
        assert_eq!(err.to_string(), "Value 1.5 above maximum 1");

        let err = check_bounds(&-1i32, &bounds).unwrap_err();
        assert_eq!(err.to_string(), "Value -1 below minimum 0");
    }

    #[test]
    fn test_f32_boundary_uses_decimal_value() {
        // 0.1f32 widened bit-for-bit is slightly above 0.1f64
        let bounds = Bounds::new(f64::NAN, 0.1);
        assert!(check_bounds(&0.1f32, &bounds).is_ok());
    }

    #[test]
    fn test_nan_fails_declared_bounds() {
        let nan: f32 = coerce_scalar(&json!("NaN")).unwrap();
        let err = check_bounds(&nan, &Bounds::new(0.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            TweakError::BoundsViolation {
                side: BoundSide::Minimum,
                ..
            }
        ));

        let err = check_bounds(&f64::NAN, &Bounds::new(f64::NAN, 1.0)).unwrap_err();
        assert!(err.to_string().contains("above maximum 1"), "{}", err);

        assert!(check_bounds(&f64::NAN, &Bounds::UNBOUNDED).is_ok());
    }

    #[test]
    fn test_unbounded_and_non_numeric() {
        assert!(check_bounds(&1e9f64, &Bounds::UNBOUNDED).is_ok());
        assert!(check_bounds(&"text".to_string(), &Bounds::new(0.0, 1.0)).is_ok());
        assert!(check_bounds(&true, &Bounds::new(5.0, 6.0)).is_ok());
    }

    #[test]
    fn test_scalar_round_trip() {
        fn round_trip<T: TweakScalar + PartialEq + std::fmt::Debug>(v: T) {
            let back: T = coerce_scalar(&scalar_to_raw(&v)).unwrap();
            assert_eq!(back, v);
        }
        round_trip(true);
        round_trip(false);
        round_trip(i32::MIN);
        round_trip(i64::MAX);
        round_trip(0.1f32);
        round_trip(-3.75e-12f64);
        round_trip(String::from(" spaced, text "));
    }
}
