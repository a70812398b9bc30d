//! Per-value conversion between Rust types and JSON values.
//!
//! Two shapes are supported:
//!
//! - **Scalar**: strings, booleans, numbers and nested records. The JSON kind
//!   must match the target type exactly.
//! - **Sequence**: `Vec<T>` of any scalar shape. A bare scalar of the element
//!   kind is accepted as a one-element list, because the service collapses
//!   single-element arrays on the wire.
//!
//! # Example
//!
//! ```
//! use beatsaver_core::mapping::ValueCodec;
//! use serde_json::json;
//!
//! let promoted = Vec::<i32>::decode("diffs", &json!(5)).unwrap();
//! assert_eq!(promoted, vec![5]);
//!
//! let listed = Vec::<i32>::decode("diffs", &json!([1, 2])).unwrap();
//! assert_eq!(listed, vec![1, 2]);
//! ```

use serde_json::Value;

use super::error::DecodeError;

/// Kind name reported for JSON objects (nested records).
pub const OBJECT_KIND: &str = "json Object";

/// Kind name reported for JSON arrays (sequence fields).
pub const ARRAY_KIND: &str = "json Array";

/// Strategy for converting one field value to and from JSON.
pub trait ValueCodec: Sized {
    /// Human-readable name of the expected JSON kind, used in errors.
    const KIND: &'static str;

    /// Returns true when `value` has a JSON kind this type can decode.
    fn matches(value: &Value) -> bool;

    /// Decodes `value`, reporting `key` in any error.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TypeMismatch`] when the JSON kind does not
    /// match, or any error raised by a nested record.
    fn decode(key: &str, value: &Value) -> Result<Self, DecodeError>;

    /// Encodes this value as JSON.
    fn encode(&self) -> Value;
}

impl ValueCodec for String {
    const KIND: &'static str = "string";

    fn matches(value: &Value) -> bool {
        value.is_string()
    }

    fn decode(key: &str, value: &Value) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| DecodeError::type_mismatch(key, Self::KIND))
    }

    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ValueCodec for bool {
    const KIND: &'static str = "bool";

    fn matches(value: &Value) -> bool {
        value.is_boolean()
    }

    fn decode(key: &str, value: &Value) -> Result<Self, DecodeError> {
        value
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch(key, Self::KIND))
    }

    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! integer_codec {
    ($ty:ty, $kind:literal, $read:ident) => {
        impl ValueCodec for $ty {
            const KIND: &'static str = $kind;

            fn matches(value: &Value) -> bool {
                value.$read().and_then(|n| <$ty>::try_from(n).ok()).is_some()
            }

            fn decode(key: &str, value: &Value) -> Result<Self, DecodeError> {
                value
                    .$read()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| DecodeError::type_mismatch(key, Self::KIND))
            }

            fn encode(&self) -> Value {
                Value::from(*self)
            }
        }
    };
}

integer_codec!(i32, "int", as_i64);
integer_codec!(i64, "int64", as_i64);
integer_codec!(u32, "uint", as_u64);

impl ValueCodec for f64 {
    const KIND: &'static str = "double";

    fn matches(value: &Value) -> bool {
        value.is_number()
    }

    fn decode(key: &str, value: &Value) -> Result<Self, DecodeError> {
        value
            .as_f64()
            .ok_or_else(|| DecodeError::type_mismatch(key, Self::KIND))
    }

    fn encode(&self) -> Value {
        Value::from(*self)
    }
}

impl ValueCodec for f32 {
    const KIND: &'static str = "float";

    fn matches(value: &Value) -> bool {
        value.is_number()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn decode(key: &str, value: &Value) -> Result<Self, DecodeError> {
        value
            .as_f64()
            .map(|n| n as f32)
            .ok_or_else(|| DecodeError::type_mismatch(key, Self::KIND))
    }

    fn encode(&self) -> Value {
        Value::from(f64::from(*self))
    }
}

impl<T: ValueCodec> ValueCodec for Vec<T> {
    const KIND: &'static str = ARRAY_KIND;

    fn matches(value: &Value) -> bool {
        value.is_array() || T::matches(value)
    }

    fn decode(key: &str, value: &Value) -> Result<Self, DecodeError> {
        // single-element arrays arrive as the bare element
        if T::matches(value) {
            return Ok(vec![T::decode(key, value)?]);
        }

        let Some(items) = value.as_array() else {
            return Err(DecodeError::type_mismatch(key, Self::KIND));
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if T::matches(item) {
                    T::decode(key, item)
                } else {
                    Err(DecodeError::element_mismatch(key, index, T::KIND))
                }
            })
            .collect()
    }

    fn encode(&self) -> Value {
        Value::Array(self.iter().map(ValueCodec::encode).collect())
    }
}
