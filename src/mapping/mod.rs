//! Declarative mapping between JSON documents and typed records.
//!
//! Records are described once with [`record!`](crate::record): each field names
//! its wire key, its Rust type and a [`Presence`] policy. The macro generates
//! the struct, accessors, and a per-type [`Registry`] that is built lazily on
//! first use and shared for the rest of the process.
//!
//! # Layers
//!
//! - [`ValueCodec`] converts a single value (scalar or sequence)
//! - [`Registry`] folds codecs over a record's ordered field list
//! - [`Record`] adds the top-level `error` check and byte parsing
//!
//! # Example
//!
//! ```
//! use beatsaver_core::mapping::{DecodeError, Record};
//! use beatsaver_core::models::Metadata;
//!
//! let err = Metadata::from_json_str(r#"{"error": "Not Found"}"#).unwrap_err();
//! assert!(matches!(err, DecodeError::RemoteReported { .. }));
//! ```

mod codec;
mod error;
mod macros;
mod record;
mod registry;

pub use codec::{ARRAY_KIND, OBJECT_KIND, ValueCodec};
pub use error::DecodeError;
pub use record::{ROOT_KEY, Record, check_remote_error, decode_nested};
pub use registry::{FieldDescriptor, Presence, Registry, RegistryBuilder};

#[doc(hidden)]
pub use serde_json::Value;
