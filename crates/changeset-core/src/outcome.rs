//! # Validation Outcome Algebra
//!
//! Every validator produces an [`Outcome`]: `Good(value)` on success or
//! `Bad(value, reason)` on failure. Both variants carry the value so a
//! validator may coerce its input (e.g. trim text) and hand the coerced
//! value to the next validator in a pipeline.
//!
//! A validator is allowed to return a plain [`Value`]; [`ret`] normalises
//! that into `Good`. An `Outcome` passes through `ret` unchanged.

use crate::value::Value;

/// Result of running a validator against a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Validation succeeded.
    Good(Value),
    /// Validation failed with a human-readable reason.
    Bad(Value, String),
}

impl Outcome {
    /// Mark `value` as valid.
    pub fn good(value: impl Into<Value>) -> Self {
        Self::Good(value.into())
    }

    /// Mark `value` as invalid for `reason`.
    pub fn bad(value: impl Into<Value>, reason: impl Into<String>) -> Self {
        Self::Bad(value.into(), reason.into())
    }

    pub fn is_good(&self) -> bool {
        matches!(self, Self::Good(_))
    }

    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(..))
    }

    /// The carried value, regardless of variant.
    pub fn value(&self) -> &Value {
        match self {
            Self::Good(v) | Self::Bad(v, _) => v,
        }
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Good(_) => None,
            Self::Bad(_, reason) => Some(reason),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Good(v) | Self::Bad(v, _) => v,
        }
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Self::Good(value)
    }
}

/// Normalise a validator return into an [`Outcome`].
///
/// Raw values become `Good`; outcomes are returned unchanged.
pub fn ret(x: impl Into<Outcome>) -> Outcome {
    x.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_constructor() {
        let o = Outcome::good(5);
        assert!(o.is_good());
        assert!(!o.is_bad());
        assert_eq!(o.value(), &Value::Number(5));
        assert_eq!(o.reason(), None);
    }

    #[test]
    fn test_bad_constructor() {
        let o = Outcome::bad("", "is required");
        assert!(o.is_bad());
        assert!(!o.is_good());
        assert_eq!(o.value(), &Value::Text(String::new()));
        assert_eq!(o.reason(), Some("is required"));
    }

    #[test]
    fn test_ret_wraps_raw_value_in_good() {
        assert_eq!(ret(Value::from("x")), Outcome::Good(Value::from("x")));
        assert_eq!(ret(Value::Null), Outcome::Good(Value::Null));
    }

    #[test]
    fn test_ret_passes_outcomes_through() {
        let bad = Outcome::bad(3, "too small");
        assert_eq!(ret(bad.clone()), bad);
        let good = Outcome::good(true);
        assert_eq!(ret(good.clone()), good);
    }

    #[test]
    fn test_into_value() {
        assert_eq!(Outcome::bad(1, "no").into_value(), Value::Number(1));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Boolean),
            any::<i64>().prop_map(Value::Number),
            (-1.0e9..1.0e9f64).prop_map(Value::Float),
            "[a-zA-Z0-9 ]{0,20}".prop_map(Value::Text),
        ]
    }

    proptest! {
        /// Normalising twice is the same as normalising once.
        #[test]
        fn ret_is_idempotent(v in any_value()) {
            let once = ret(v.clone());
            prop_assert_eq!(ret(once.clone()), once);
        }

        /// A raw value is always Good and keeps its payload.
        #[test]
        fn raw_values_are_good(v in any_value()) {
            let o = ret(v.clone());
            prop_assert!(o.is_good());
            prop_assert_eq!(o.into_value(), v);
        }
    }
}
