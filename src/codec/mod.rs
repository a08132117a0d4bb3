mod carrier;
mod convert;
mod converter;
mod decode;
mod encode;
mod entity;
mod error;
mod escape;
mod hint;
mod node;
mod reverse;
mod tag;
mod value;

/// Uniform field access over host objects.
pub use carrier::{FieldCarrier, PRIVATE_PREFIX, is_private};
/// Conversions from native Rust values into the host value model.
pub use convert::IntoValue;
/// Whole-document text helpers.
pub use converter::{fiware_to_obj, fiware_value_to_obj, obj_to_fiware};
/// Tagged-tree decoding entry point and options.
pub use decode::{DecodeOptions, decode_node};
/// Value encoding entry point, options, and defaults.
pub use encode::{DEFAULT_BYTE_ARRAY_THRESHOLD, DEFAULT_MAX_DEPTH, EncodeOptions, encode_value};
/// Entity root wrapper and encoding entry points.
pub use entity::{Entity, encode_entity, encode_entity_value};
/// Error and result aliases.
pub use error::{CodecError, Result};
/// Percent-encoding at the document boundary.
pub use escape::{escape, unescape};
/// Concrete-type hints for downstream schemas.
pub use hint::TypeHint;
/// Tagged tree produced by the encoder.
pub use node::{NodeValue, ValueNode};
/// Decoded-document attachment types.
pub use reverse::{AttachOptions, AttachPolicy, ReverseEntity};
/// Wire-tag vocabulary and metadata schema.
pub use tag::{
	ByteArrayKind, DATA_TYPE_KEY, HOST_TYPE_KEY, HostType, LEGACY_HOST_TYPE_KEY, METADATA_ENTRY_TYPE, Metadata, TAG_ARRAY, TAG_BASE64, TAG_BOOLEAN, TAG_NONE, TAG_NUMBER,
	TAG_OBJECT, TAG_STRING, WireCategory, data_type_of, host_type_of,
};
/// Host value model.
pub use value::{Complex, CompositeValue, DeclaredField, FieldLayout, FieldValue, MessageValue, Value, ValueKind};
