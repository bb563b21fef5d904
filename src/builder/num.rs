use super::{opt_bool, opt_keyword};
use crate::error::Result;
use crate::model::NumericMetadata;
use crate::raw::RawNode;

/// Numeric representation a bound keyword is coerced into.
pub trait Numeric: Copy + std::fmt::Debug {
    const EXPECTED: &'static str;
    fn coerce<N: RawNode>(node: &N) -> Option<Self>;
}

impl Numeric for f64 {
    const EXPECTED: &'static str = "a number";
    fn coerce<N: RawNode>(node: &N) -> Option<Self> {
        node.as_f64()
    }
}

impl Numeric for i64 {
    const EXPECTED: &'static str = "an integer";
    fn coerce<N: RawNode>(node: &N) -> Option<Self> {
        node.as_i64()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NumericMetadataBuilder<T> {
    pub minimum: Option<T>,
    pub exclusive_minimum: Option<bool>,
    pub maximum: Option<T>,
    pub exclusive_maximum: Option<bool>,
    pub multiple_of: Option<T>,
}

impl<T: Numeric> NumericMetadataBuilder<T> {
    pub(crate) fn decode<N: RawNode>(node: &N, at: &str) -> Result<Self> {
        let bound = |keyword: &str| opt_keyword(node, keyword, T::EXPECTED, at, T::coerce::<N>);
        Ok(Self {
            minimum: bound("minimum")?,
            exclusive_minimum: opt_bool(node, "exclusiveMinimum", at)?,
            maximum: bound("maximum")?,
            exclusive_maximum: opt_bool(node, "exclusiveMaximum", at)?,
            multiple_of: bound("multipleOf")?,
        })
    }

    /// Field-by-field copy; absent exclusivity flags become inclusive.
    pub fn build(&self) -> NumericMetadata<T> {
        NumericMetadata {
            minimum: self.minimum,
            exclusive_minimum: self.exclusive_minimum.unwrap_or(false),
            maximum: self.maximum,
            exclusive_maximum: self.exclusive_maximum.unwrap_or(false),
            multiple_of: self.multiple_of,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use serde_json::json;

    #[test]
    fn absent_bounds_stay_unset_and_inclusive() {
        let m = NumericMetadataBuilder::<i64>::decode(&json!({"type": "integer"}), "").unwrap().build();
        assert_eq!(m.minimum, None);
        assert_eq!(m.maximum, None);
        assert_eq!(m.multiple_of, None);
        assert!(!m.exclusive_minimum);
        assert!(!m.exclusive_maximum);
    }

    #[test]
    fn bounds_are_copied_without_consistency_checks() {
        let m = NumericMetadataBuilder::<f64>::decode(
            &json!({"minimum": 10.5, "maximum": 1, "exclusiveMaximum": true, "multipleOf": -2}),
            "",
        )
        .unwrap()
        .build();
        assert_eq!(m.minimum, Some(10.5));
        assert_eq!(m.maximum, Some(1.0));
        assert!(m.exclusive_maximum);
        assert!(!m.exclusive_minimum);
        assert_eq!(m.multiple_of, Some(-2.0));
    }

    #[test]
    fn integer_bounds_reject_fractions() {
        let m = NumericMetadataBuilder::<i64>::decode(&json!({"minimum": 3.0}), "").unwrap();
        assert_eq!(m.minimum, Some(3));
        let err = NumericMetadataBuilder::<i64>::decode(&json!({"minimum": 3.5}), "/i").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeCoercionFailure { ref at, expected: "an integer", .. } if at == "/i/minimum"
        ));
    }

    #[test]
    fn non_numeric_bound_and_non_boolean_flag_fail() {
        let err = NumericMetadataBuilder::<f64>::decode(&json!({"maximum": "ten"}), "").unwrap_err();
        assert!(matches!(err, SchemaError::TypeCoercionFailure { found: "string", .. }));
        let err = NumericMetadataBuilder::<f64>::decode(&json!({"exclusiveMinimum": 1}), "").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeCoercionFailure { ref keyword, expected: "a boolean", .. } if keyword == "exclusiveMinimum"
        ));
    }
}
