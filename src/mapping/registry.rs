//! Ordered field descriptor lists for record types.
//!
//! A [`Registry`] is built once per record type and shared read-only for the
//! life of the process. Each [`FieldDescriptor`] pairs a wire key with a
//! presence policy and the closures that move one field in and out of a JSON
//! object.

use std::fmt;

use serde_json::{Map, Value};

use super::codec::ValueCodec;
use super::error::DecodeError;

/// How a field behaves when its key is absent or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent fails with `MissingField`; `null` fails with `TypeMismatch`.
    Required,
    /// Absent or `null` leaves the field unset. Encoded only when set.
    Optional,
    /// Absent or `null` keeps the preset default. Always encoded.
    DefaultValued,
}

type EncodeFn<R> = Box<dyn Fn(&R, &mut Map<String, Value>) + Send + Sync>;
type DecodeFn<R> = Box<dyn Fn(&mut R, Option<&Value>) -> Result<(), DecodeError> + Send + Sync>;

/// One field of a record type: wire key, presence policy and codec.
pub struct FieldDescriptor<R> {
    key: &'static str,
    presence: Presence,
    kind: &'static str,
    encode: EncodeFn<R>,
    decode: DecodeFn<R>,
}

impl<R> FieldDescriptor<R> {
    /// Returns the wire key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the presence policy.
    #[must_use]
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Returns the name of the JSON kind this field expects.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("presence", &self.presence)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Ordered list of field descriptors for one record type.
///
/// Insertion order is serialization order. Keys are unique.
pub struct Registry<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("fields", &self.fields)
            .finish()
    }
}

impl<R: Default + 'static> Registry<R> {
    /// Starts an empty registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder<R> {
        RegistryBuilder { fields: Vec::new() }
    }

    /// Returns the descriptors in serialization order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    /// Returns the wire keys in serialization order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::key)
    }

    /// Writes every field of `record` into a new JSON object.
    #[must_use]
    pub fn encode_all(&self, record: &R) -> Map<String, Value> {
        let mut object = Map::new();
        for field in &self.fields {
            (field.encode)(record, &mut object);
        }
        object
    }

    /// Builds a record from `object`, stopping at the first failing field.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] raised by any field.
    pub fn decode_all(&self, object: &Map<String, Value>) -> Result<R, DecodeError> {
        let mut record = R::default();
        for field in &self.fields {
            (field.decode)(&mut record, object.get(field.key))?;
        }
        Ok(record)
    }
}

/// Builder collecting field descriptors for a [`Registry`].
///
/// The `read` and `slot` accessors borrow the field out of the record for
/// encoding and decoding respectively.
pub struct RegistryBuilder<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R: 'static> RegistryBuilder<R> {
    /// Adds a field that must be present and non-null.
    #[must_use]
    pub fn required<T: ValueCodec + 'static>(
        self,
        key: &'static str,
        read: fn(&R) -> &T,
        slot: fn(&mut R) -> &mut T,
    ) -> Self {
        self.push(FieldDescriptor {
            key,
            presence: Presence::Required,
            kind: T::KIND,
            encode: Box::new(move |record: &R, object: &mut Map<String, Value>| {
                object.insert(key.to_owned(), read(record).encode());
            }),
            decode: Box::new(move |record: &mut R, value: Option<&Value>| {
                let value = value.ok_or_else(|| DecodeError::missing_field(key))?;
                *slot(record) = T::decode(key, value)?;
                Ok(())
            }),
        })
    }

    /// Adds a field that may be absent or `null`.
    #[must_use]
    pub fn optional<T: ValueCodec + 'static>(
        self,
        key: &'static str,
        read: fn(&R) -> &Option<T>,
        slot: fn(&mut R) -> &mut Option<T>,
    ) -> Self {
        self.push(FieldDescriptor {
            key,
            presence: Presence::Optional,
            kind: T::KIND,
            encode: Box::new(move |record: &R, object: &mut Map<String, Value>| {
                if let Some(value) = read(record) {
                    object.insert(key.to_owned(), value.encode());
                }
            }),
            decode: Box::new(move |record: &mut R, value: Option<&Value>| {
                match value {
                    None | Some(Value::Null) => {}
                    Some(value) => *slot(record) = Some(T::decode(key, value)?),
                }
                Ok(())
            }),
        })
    }

    /// Adds a field that keeps its preset default when absent or `null`.
    #[must_use]
    pub fn defaulted<T: ValueCodec + 'static>(
        self,
        key: &'static str,
        read: fn(&R) -> &T,
        slot: fn(&mut R) -> &mut T,
    ) -> Self {
        self.push(FieldDescriptor {
            key,
            presence: Presence::DefaultValued,
            kind: T::KIND,
            encode: Box::new(move |record: &R, object: &mut Map<String, Value>| {
                object.insert(key.to_owned(), read(record).encode());
            }),
            decode: Box::new(move |record: &mut R, value: Option<&Value>| {
                match value {
                    None | Some(Value::Null) => {}
                    Some(value) => *slot(record) = T::decode(key, value)?,
                }
                Ok(())
            }),
        })
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> Registry<R> {
        Registry {
            fields: self.fields,
        }
    }

    fn push(mut self, field: FieldDescriptor<R>) -> Self {
        debug_assert!(
            self.fields.iter().all(|existing| existing.key != field.key),
            "duplicate field key '{}'",
            field.key
        );
        self.fields.push(field);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        name: String,
        tags: Vec<String>,
        rating: Option<f64>,
        plays: i32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: String::new(),
                tags: Vec::new(),
                rating: None,
                plays: -1,
            }
        }
    }

    fn sample_registry() -> Registry<Sample> {
        Registry::<Sample>::builder()
            .required::<String>("name", |p: &Sample| &p.name, |p: &mut Sample| &mut p.name)
            .required::<Vec<String>>("tags", |p: &Sample| &p.tags, |p: &mut Sample| &mut p.tags)
            .optional::<f64>("rating", |p: &Sample| &p.rating, |p: &mut Sample| &mut p.rating)
            .defaulted::<i32>("plays", |p: &Sample| &p.plays, |p: &mut Sample| &mut p.plays)
            .build()
    }

    fn as_object(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    // ==================== Decode Tests ====================

    #[test]
    fn test_decode_all_fields_present() {
        let input = json!({"name": "a", "tags": ["x", "y"], "rating": 0.5, "plays": 9});
        let sample = sample_registry().decode_all(as_object(&input)).unwrap();
        assert_eq!(sample.name, "a");
        assert_eq!(sample.tags, vec!["x", "y"]);
        assert_eq!(sample.rating, Some(0.5));
        assert_eq!(sample.plays, 9);
    }

    #[test]
    fn test_required_absent_is_missing_field() {
        let input = json!({"tags": []});
        let err = sample_registry().decode_all(as_object(&input)).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { ref key } if key == "name"));
    }

    #[test]
    fn test_required_null_is_type_mismatch() {
        let input = json!({"name": null, "tags": []});
        let err = sample_registry().decode_all(as_object(&input)).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_optional_absent_or_null_stays_unset() {
        let registry = sample_registry();
        let absent = json!({"name": "a", "tags": []});
        let null = json!({"name": "a", "tags": [], "rating": null});
        assert_eq!(registry.decode_all(as_object(&absent)).unwrap().rating, None);
        assert_eq!(registry.decode_all(as_object(&null)).unwrap().rating, None);
    }

    #[test]
    fn test_optional_wrong_kind_is_type_mismatch() {
        let input = json!({"name": "a", "tags": [], "rating": "high"});
        let err = sample_registry().decode_all(as_object(&input)).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { ref key, .. } if key == "rating"));
    }

    #[test]
    fn test_defaulted_absent_or_null_keeps_default() {
        let registry = sample_registry();
        let absent = json!({"name": "a", "tags": []});
        let null = json!({"name": "a", "tags": [], "plays": null});
        assert_eq!(registry.decode_all(as_object(&absent)).unwrap().plays, -1);
        assert_eq!(registry.decode_all(as_object(&null)).unwrap().plays, -1);
    }

    #[test]
    fn test_defaulted_wrong_kind_is_type_mismatch() {
        let input = json!({"name": "a", "tags": [], "plays": "many"});
        assert!(sample_registry().decode_all(as_object(&input)).is_err());
    }

    #[test]
    fn test_first_failure_wins() {
        // both fields are bad; "name" is registered first
        let input = json!({"name": 1, "tags": 2});
        let err = sample_registry().decode_all(as_object(&input)).unwrap_err();
        assert_eq!(err.key(), Some("name"));
    }

    // ==================== Encode Tests ====================

    #[test]
    fn test_encode_skips_unset_optional() {
        let sample = Sample {
            name: "a".into(),
            ..Sample::default()
        };
        let object = sample_registry().encode_all(&sample);
        assert!(!object.contains_key("rating"));
        assert_eq!(object.get("plays"), Some(&json!(-1)));
    }

    #[test]
    fn test_encode_follows_registration_order() {
        let sample = Sample {
            rating: Some(1.0),
            ..Sample::default()
        };
        let object = sample_registry().encode_all(&sample);
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "tags", "rating", "plays"]);
    }

    #[test]
    fn test_round_trip() {
        let sample = Sample {
            name: "song".into(),
            tags: vec!["tech".into()],
            rating: Some(0.75),
            plays: 3,
        };
        let registry = sample_registry();
        let encoded = Value::Object(registry.encode_all(&sample));
        assert_eq!(registry.decode_all(as_object(&encoded)).unwrap(), sample);
    }

    #[test]
    fn test_descriptor_metadata() {
        let registry = sample_registry();
        let keys: Vec<&str> = registry.keys().collect();
        assert_eq!(keys, vec!["name", "tags", "rating", "plays"]);
        assert_eq!(registry.fields()[1].kind(), "json Array");
        assert_eq!(registry.fields()[2].presence(), Presence::Optional);
        assert_eq!(registry.fields()[3].presence(), Presence::DefaultValued);
    }
}
