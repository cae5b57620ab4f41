//! Scalar and enum coercion

use livetweak_sdk::ValueKind;

/// Trait for types that can be used as scalar tweak values
///
/// Parsing is culture-invariant: `.` is the only decimal separator and no
/// digit grouping is accepted.
pub trait TweakScalar: Clone + Send + Sync + 'static {
    /// Value kind reported in the schema
    const KIND: ValueKind;

    /// Destination type name used in error messages
    fn type_name() -> &'static str;

    /// Parse from a string
    fn parse_value(s: &str) -> Option<Self>;

    /// Convert to a string representation
    fn to_string_value(&self) -> String;

    /// Numeric view used for bounds validation
    fn as_f64(&self) -> Option<f64> {
        None
    }

    /// Fully-qualified enum type name, for enum scalars
    fn enum_type() -> Option<&'static str> {
        None
    }
}

impl TweakScalar for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn type_name() -> &'static str {
        "bool"
    }

    fn parse_value(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    fn to_string_value(&self) -> String {
        ToString::to_string(self)
    }
}

macro_rules! impl_integer_scalar {
    ($($ty:ty),*) => {
        $(
            impl TweakScalar for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn type_name() -> &'static str {
                    stringify!($ty)
                }

                fn parse_value(s: &str) -> Option<Self> {
                    s.trim().parse().ok()
                }

                fn to_string_value(&self) -> String {
                    ToString::to_string(self)
                }

                fn as_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

impl_integer_scalar!(i32, i64);

impl TweakScalar for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn type_name() -> &'static str {
        "f32"
    }

    fn parse_value(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn to_string_value(&self) -> String {
        ToString::to_string(self)
    }

    fn as_f64(&self) -> Option<f64> {
        // Go through the shortest decimal form so 0.1f32 compares as 0.1
        self.to_string().parse().ok()
    }
}

impl TweakScalar for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn type_name() -> &'static str {
        "f64"
    }

    fn parse_value(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn to_string_value(&self) -> String {
        ToString::to_string(self)
    }

    fn as_f64(&self) -> Option<f64> {
        Some(*self)
    }
}

impl TweakScalar for String {
    const KIND: ValueKind = ValueKind::String;

    fn type_name() -> &'static str {
        "String"
    }

    fn parse_value(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn to_string_value(&self) -> String {
        self.clone()
    }
}

/// Trait for fieldless enums usable as tweak values
///
/// Usually derived with `#[derive(TweakEnum)]`, which also implements
/// [`TweakScalar`] in terms of this trait.
pub trait TweakEnum: Clone + Send + Sync + 'static {
    /// Fully-qualified type name
    const TYPE_NAME: &'static str;

    /// Every variant, in declaration order
    const VARIANTS: &'static [Self];

    /// Variant name
    fn name(&self) -> &'static str;
}

/// Match a variant by name, ignoring ASCII case
///
/// An unmatched name is `None`; there is no closest-match guessing.
pub fn parse_enum<E: TweakEnum>(s: &str) -> Option<E> {
    let s = s.trim();
    E::VARIANTS
        .iter()
        .find(|variant| variant.name().eq_ignore_ascii_case(s))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Quality {
        Low,
        High,
    }

    impl TweakEnum for Quality {
        const TYPE_NAME: &'static str = "tests::Quality";
        const VARIANTS: &'static [Self] = &[Self::Low, Self::High];

        fn name(&self) -> &'static str {
            match self {
                Self::Low => "Low",
                Self::High => "High",
            }
        }
    }

    #[test]
    fn test_bool_values() {
        assert_eq!(bool::parse_value("1"), Some(true));
        assert_eq!(bool::parse_value("True"), Some(true));
        assert_eq!(bool::parse_value("yes"), Some(true));
        assert_eq!(bool::parse_value("on"), Some(true));
        assert_eq!(bool::parse_value("0"), Some(false));
        assert_eq!(bool::parse_value("FALSE"), Some(false));
        assert_eq!(bool::parse_value("no"), Some(false));
        assert_eq!(bool::parse_value("off"), Some(false));
        assert_eq!(bool::parse_value("maybe"), None);
        assert_eq!(true.to_string_value(), "true");
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(i32::parse_value("42"), Some(42));
        assert_eq!(i32::parse_value(" -10 "), Some(-10));
        assert_eq!(i32::parse_value("1.5"), None);
        assert_eq!(i32::parse_value("3000000000"), None);
        assert_eq!(i64::parse_value("3000000000"), Some(3_000_000_000));
        assert_eq!(i32::KIND, ValueKind::Integer);
        assert_eq!(i64::KIND, ValueKind::Integer);
    }

    #[test]
    fn test_float_values_are_invariant() {
        assert_eq!(f32::parse_value("3.14"), Some(3.14));
        assert_eq!(f64::parse_value("-2.5"), Some(-2.5));
        assert_eq!(f64::parse_value("2,5"), None);
        assert_eq!(f32::parse_value("1,000"), None);
        assert_eq!(0.8f32.to_string_value(), "0.8");
        assert_eq!(1.0f64.to_string_value(), "1");
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(String::parse_value("  padded "), Some("  padded ".to_string()));
        assert_eq!(String::KIND, ValueKind::String);
        assert_eq!(String::new().as_f64(), None);
    }

    #[test]
    fn test_enum_case_insensitive() {
        assert_eq!(parse_enum::<Quality>("high"), Some(Quality::High));
        assert_eq!(parse_enum::<Quality>("LOW"), Some(Quality::Low));
        assert_eq!(parse_enum::<Quality>("Hig"), None);
        assert_eq!(parse_enum::<Quality>("Medium"), None);
    }
}
