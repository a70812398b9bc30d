//! Declarative record definitions.
//!
//! [`record!`](crate::record) turns a field list into a struct with private
//! storage, read accessors, a `Default` impl honoring per-field defaults, a
//! lazily built [`Registry`](crate::mapping::Registry) and a
//! [`ValueCodec`](crate::mapping::ValueCodec) impl so the record can be nested
//! inside other records.

/// Defines a record type from a list of `field: Type = presence("key")`
/// entries.
///
/// Presence is one of `required`, `optional` or `defaulted`. A `defaulted`
/// entry may carry the default as a second argument; otherwise the type's
/// `Default` is used.
///
/// # Example
///
/// ```
/// use beatsaver_core::mapping::Record;
///
/// beatsaver_core::record! {
///     /// A song tag summary.
///     pub struct TagCount {
///         /// Tag name.
///         name: String = required("name"),
///         /// Number of maps using the tag.
///         count: i32 = defaulted("count", 0),
///         /// Optional description.
///         description: String = optional("description"),
///     }
/// }
///
/// let tag = TagCount::from_json_str(r#"{"name": "tech"}"#).unwrap();
/// assert_eq!(tag.name(), "tech");
/// assert_eq!(*tag.count(), 0);
/// assert!(tag.description().is_none());
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty = $presence:ident ( $key:literal $(, $default:expr)? )
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $( $field: $crate::record_field_type!($presence, $ty), )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $crate::record_field_default!($presence $(, $default)?), )*
                }
            }
        }

        impl $name {
            $( $crate::record_accessor!($(#[$field_meta])* $presence $field: $ty); )*
        }

        impl $crate::mapping::Record for $name {
            fn registry() -> &'static $crate::mapping::Registry<Self> {
                static REGISTRY: ::std::sync::LazyLock<$crate::mapping::Registry<$name>> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::mapping::Registry::<$name>::builder()
                            $(
                                .$presence::<$ty>(
                                    $key,
                                    |record: &$name| &record.$field,
                                    |record: &mut $name| &mut record.$field,
                                )
                            )*
                            .build()
                    });
                &REGISTRY
            }
        }

        impl $crate::mapping::ValueCodec for $name {
            const KIND: &'static str = $crate::mapping::OBJECT_KIND;

            fn matches(value: &$crate::mapping::Value) -> bool {
                value.is_object()
            }

            fn decode(
                key: &str,
                value: &$crate::mapping::Value,
            ) -> ::std::result::Result<Self, $crate::mapping::DecodeError> {
                $crate::mapping::decode_nested(key, value)
            }

            fn encode(&self) -> $crate::mapping::Value {
                $crate::mapping::Record::to_value(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! record_field_type {
    (optional, $ty:ty) => { ::std::option::Option<$ty> };
    (required, $ty:ty) => { $ty };
    (defaulted, $ty:ty) => { $ty };
}

#[doc(hidden)]
#[macro_export]
macro_rules! record_field_default {
    (optional) => { ::std::option::Option::None };
    (required) => { ::std::default::Default::default() };
    (defaulted, $default:expr) => { $default };
    (defaulted) => { ::std::default::Default::default() };
}

#[doc(hidden)]
#[macro_export]
macro_rules! record_accessor {
    ($(#[$meta:meta])* optional $field:ident: $ty:ty) => {
        $(#[$meta])*
        #[must_use]
        pub fn $field(&self) -> ::std::option::Option<&$ty> {
            self.$field.as_ref()
        }
    };
    ($(#[$meta:meta])* $presence:ident $field:ident: $ty:ty) => {
        $(#[$meta])*
        #[must_use]
        pub fn $field(&self) -> &$ty {
            &self.$field
        }
    };
}
