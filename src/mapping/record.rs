//! Whole-record encode/decode on top of a type's [`Registry`].

use serde_json::Value;

use super::codec::OBJECT_KIND;
use super::error::DecodeError;
use super::registry::Registry;

/// Key reported when the top-level document itself has the wrong kind.
pub const ROOT_KEY: &str = "<root>";

/// Member name the service uses to report a failed request.
const ERROR_MEMBER: &str = "error";

/// A type with a lazily built, process-wide field registry.
///
/// Implementations are normally generated by [`record!`](crate::record).
pub trait Record: Default + Sized + 'static {
    /// Returns the registry for this type, building it on first use.
    fn registry() -> &'static Registry<Self>;

    /// Decodes a record from a JSON value.
    ///
    /// A top-level `error` member is reported as
    /// [`DecodeError::RemoteReported`] before any field is looked at.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for a remote-reported failure, a non-object
    /// document, or the first field that fails to decode.
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        check_remote_error(value)?;
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::type_mismatch(ROOT_KEY, OBJECT_KIND))?;
        Self::registry().decode_all(object)
    }

    /// Encodes this record as a JSON object.
    fn to_value(&self) -> Value {
        Value::Object(Self::registry().encode_all(self))
    }

    /// Parses `bytes` as JSON and decodes a record from it.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] when the bytes are not JSON, or
    /// any error from [`Record::from_value`].
    fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::malformed)?;
        Self::from_value(&value)
    }

    /// Parses `text` as JSON and decodes a record from it.
    ///
    /// # Errors
    ///
    /// Same as [`Record::from_slice`].
    fn from_json_str(text: &str) -> Result<Self, DecodeError> {
        Self::from_slice(text.as_bytes())
    }
}

/// Fails with [`DecodeError::RemoteReported`] when `value` carries an
/// `error` member.
///
/// A `null` error member is treated as absent.
///
/// # Errors
///
/// Returns the remote-reported error described above.
pub fn check_remote_error(value: &Value) -> Result<(), DecodeError> {
    match value.get(ERROR_MEMBER) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(message)) => Err(DecodeError::remote_reported(message.as_str())),
        Some(other) => Err(DecodeError::remote_reported(other.to_string())),
    }
}

/// Decodes a record nested under `key` inside a parent object.
///
/// # Errors
///
/// Returns [`DecodeError::TypeMismatch`] when `value` is not an object, or
/// any error from [`Record::from_value`].
pub fn decode_nested<R: Record>(key: &str, value: &Value) -> Result<R, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::type_mismatch(key, OBJECT_KIND));
    }
    R::from_value(value)
}
